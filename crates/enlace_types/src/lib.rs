pub mod contracts;
pub mod menu;
pub mod policy;
pub mod section;

pub use contracts::*;
pub use menu::*;
pub use policy::*;
pub use section::*;
