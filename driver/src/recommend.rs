pub use self::gemini::*;

mod gemini;
