use crate::KernelError;

/// Hands out connections to the remote record store. There is deliberately no
/// transaction abstraction: every write the marketplace issues is an
/// independent statement, and the store resolves concurrent writers
/// last-writer-wins.
#[async_trait::async_trait]
pub trait DatabaseConnection<Connection: Send>: 'static + Sync + Send {
    async fn acquire(&self) -> error_stack::Result<Connection, KernelError>;
}

pub trait DependOnDatabaseConnection<Connection: Send>: 'static + Sync + Send {
    type DatabaseConnection: DatabaseConnection<Connection>;
    fn database_connection(&self) -> &Self::DatabaseConnection;
}
