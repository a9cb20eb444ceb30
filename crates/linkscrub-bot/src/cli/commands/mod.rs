mod clean;
mod run;
mod scrub;
mod set_webhook;

pub use clean::run_clean;
pub use run::run_serve;
pub use scrub::run_scrub;
pub use set_webhook::run_set_webhook;
