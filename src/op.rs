//! Identifiers for the driver operations an instrumented connection intercepts.

/// Driver operations that can be logged, traced, or excluded.
///
/// Exclusion works on plain strings, so any identifier a wrapper emits can be
/// excluded. These variants name the ones a SQL driver wrapper emits for the
/// standard connection, statement, transaction, result and rows calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ConnectorConnect,
    Ping,
    ConnPrepare,
    ConnExec,
    ConnQuery,
    ConnResetSession,
    StmtExec,
    StmtQuery,
    StmtClose,
    TxBegin,
    TxCommit,
    TxRollback,
    ResLastInsertId,
    ResRowsAffected,
    RowsNext,
    RowsClose,
}

impl Op {
    /// Every known operation, in call-lifecycle order.
    pub const ALL: [Op; 16] = [
        Op::ConnectorConnect,
        Op::Ping,
        Op::ConnPrepare,
        Op::ConnExec,
        Op::ConnQuery,
        Op::ConnResetSession,
        Op::StmtExec,
        Op::StmtQuery,
        Op::StmtClose,
        Op::TxBegin,
        Op::TxCommit,
        Op::TxRollback,
        Op::ResLastInsertId,
        Op::ResRowsAffected,
        Op::RowsNext,
        Op::RowsClose,
    ];

    /// Returns the identifier used for span names and exclusion lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::ConnectorConnect => "sql-connector-connect",
            Op::Ping => "sql-ping",
            Op::ConnPrepare => "sql-conn-prepare",
            Op::ConnExec => "sql-conn-exec",
            Op::ConnQuery => "sql-conn-query",
            Op::ConnResetSession => "sql-conn-reset-session",
            Op::StmtExec => "sql-stmt-exec",
            Op::StmtQuery => "sql-stmt-query",
            Op::StmtClose => "sql-stmt-close",
            Op::TxBegin => "sql-tx-begin",
            Op::TxCommit => "sql-tx-commit",
            Op::TxRollback => "sql-tx-rollback",
            Op::ResLastInsertId => "sql-res-lastInsertId",
            Op::ResRowsAffected => "sql-res-rowsAffected",
            Op::RowsNext => "sql-rows-next",
            Op::RowsClose => "sql-rows-close",
        }
    }

    /// Whether this operation carries query text and arguments.
    pub fn carries_query(&self) -> bool {
        matches!(
            self,
            Op::ConnPrepare | Op::ConnExec | Op::ConnQuery | Op::StmtExec | Op::StmtQuery
        )
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Op {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Op> for String {
    fn from(op: Op) -> Self {
        op.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique() {
        let mut names: Vec<&str> = Op::ALL.iter().map(|op| op.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Op::ALL.len());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Op::ConnQuery.to_string(), "sql-conn-query");
        assert_eq!(String::from(Op::TxCommit), "sql-tx-commit");
    }

    #[test]
    fn test_query_carrying_operations() {
        assert!(Op::ConnQuery.carries_query());
        assert!(Op::StmtExec.carries_query());
        assert!(!Op::TxBegin.carries_query());
        assert!(!Op::RowsNext.carries_query());
    }
}
