//! API request handlers.

mod aggregate;
mod data;
mod summary;

pub use aggregate::*;
pub use data::*;
pub use summary::*;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use bikeshare::{Dashboard, Loader};

    use crate::server::state::AppState;

    const DAYS: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.34,0.36,0.80,0.16,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.36,0.35,0.69,0.24,131,670,801
3,2011-01-03,1,0,1,0,1,1,1,0.19,0.18,0.43,0.24,120,1229,1349
336,2011-12-02,4,0,12,0,5,1,1,0.31,0.30,0.52,0.22,275,4428,4703
367,2012-01-01,1,1,1,0,0,0,1,0.37,0.37,0.69,0.19,686,1608,2294
";

    pub fn state() -> AppState {
        let dataset = Loader::new().load_bytes(DAYS.as_bytes()).unwrap();
        AppState::new(Arc::new(Dashboard::new(dataset).unwrap()))
    }
}
