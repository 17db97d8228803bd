pub mod list;
pub mod validate;

pub use list::execute_list;
pub use validate::execute_validate;
