pub mod use_cases;

pub use use_cases::action_service::ActionService;
pub use use_cases::datasets::Datasets;
