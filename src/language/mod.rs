// Types representing tokenized source lines and the taxonomy tree

mod error;
mod indent;
mod line;
mod taxonomy;

// Re-export all public symbols
pub use error::*;
pub use indent::*;
pub use line::*;
pub use taxonomy::*;
