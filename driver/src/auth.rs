pub use self::supabase::*;

mod supabase;
