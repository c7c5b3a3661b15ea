use rusqlite::{Connection, OptionalExtension, Result, params_from_iter};

/// Aggregate view of the stored records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationStats {
    pub total: i64,
    pub with_position: i64,
    pub by_kind: Vec<(String, i64)>,
    pub by_source: Vec<(String, i64)>,
    pub by_semantic_type: Vec<(String, i64)>,
    pub by_activity_type: Vec<(String, i64)>,
    pub first_key_time: Option<String>,
    pub last_key_time: Option<String>,
}

/// WHERE clause plus positional arguments.
struct Filter {
    clauses: Vec<String>,
    args: Vec<String>,
}

impl Filter {
    fn owner(owner: Option<&str>) -> Self {
        let mut f = Filter {
            clauses: Vec::new(),
            args: Vec::new(),
        };
        if let Some(o) = owner {
            f.bind("owner = ?", o);
        }
        f
    }

    fn bind(&mut self, clause: &str, value: &str) {
        self.args.push(value.to_string());
        self.clauses.push(format!("{clause}{}", self.args.len()));
    }

    fn and(mut self, raw: &str) -> Self {
        self.clauses.push(raw.to_string());
        self
    }

    fn kind(mut self, kind: &str) -> Self {
        self.bind("kind = ?", kind);
        self
    }

    fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn count(conn: &Connection, filter: &Filter) -> Result<i64> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM locations{}", filter.sql()),
        params_from_iter(filter.args.iter()),
        |row| row.get(0),
    )
}

fn grouped(conn: &Connection, column: &str, filter: &Filter) -> Result<Vec<(String, i64)>> {
    let sql = format!(
        "SELECT IFNULL({column}, '-'), COUNT(*) FROM locations{}
         GROUP BY 1 ORDER BY 2 DESC, 1 ASC",
        filter.sql()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(filter.args.iter()), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn edge_key_time(conn: &Connection, filter: &Filter, order: &str) -> Result<Option<String>> {
    conn.query_row(
        &format!(
            "SELECT key_time FROM locations{} ORDER BY key_time {order} LIMIT 1",
            filter.sql()
        ),
        params_from_iter(filter.args.iter()),
        |row| row.get(0),
    )
    .optional()
}

/// Counts over all records, or over one owner's records.
///
/// Activity types are counted on `activity_start` rows only; start and end
/// rows of one activity share the same type.
pub fn collect_stats(conn: &Connection, owner: Option<&str>) -> Result<LocationStats> {
    let all = Filter::owner(owner);

    Ok(LocationStats {
        total: count(conn, &all)?,
        with_position: count(conn, &Filter::owner(owner).and("latitude IS NOT NULL"))?,
        by_kind: grouped(conn, "kind", &all)?,
        by_source: grouped(conn, "source", &all)?,
        by_semantic_type: grouped(
            conn,
            "visit_semantic_type",
            &Filter::owner(owner).kind("visit"),
        )?,
        by_activity_type: grouped(
            conn,
            "activity_type",
            &Filter::owner(owner).kind("activity_start"),
        )?,
        first_key_time: edge_key_time(conn, &all, "ASC")?,
        last_key_time: edge_key_time(conn, &all, "DESC")?,
    })
}
