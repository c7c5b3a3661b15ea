//! pathfinder main entrypoint.

use pathfinder::run;
use pathfinder::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
