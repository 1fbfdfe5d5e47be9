pub mod indent;
pub mod printer;

pub use indent::IndentContext;
pub use printer::{print_file, Printer};
