pub mod ievents;
pub mod istates;
pub mod snapshot;

pub use ievents::*;
pub use istates::*;
pub use snapshot::*;

use chrono::{Local, NaiveDateTime};

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
