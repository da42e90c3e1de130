pub mod birth_date;
pub mod gender;
pub mod membership;
pub mod progress;
pub mod role;
pub mod status;
pub mod student_code;

pub use gender::Gender;
pub use progress::Progress;
pub use role::Role;
pub use status::Status;
