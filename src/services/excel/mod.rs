pub mod reader;
pub mod types;
pub mod utils;

pub use reader::read_sheet;
pub use utils::load_file_from_url;
