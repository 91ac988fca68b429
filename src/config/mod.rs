pub mod settings;

pub use settings::{AppConfig, LadderSettings, NotifySettings, RatingSettings};
