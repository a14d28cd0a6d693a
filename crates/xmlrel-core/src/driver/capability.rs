#[derive(Debug)]
pub struct Capability {
    /// When true, the database uses a SQL-based query language.
    pub sql: bool,

    /// Character used to quote table and column identifiers.
    pub identifier_quote: char,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        identifier_quote: '"',
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self { ..Self::SQLITE };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        identifier_quote: '`',
        ..Self::SQLITE
    };
}
