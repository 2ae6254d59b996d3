pub use crate::error::*;

mod auth;
mod database;
mod entity;
mod error;
mod modify;
mod query;
mod recommend;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod auth {
        pub use crate::auth::*;
    }
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod recommend {
        pub use crate::recommend::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
}
