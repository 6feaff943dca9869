//=========================================================================
// World Errors
//=========================================================================

/// Lifecycle errors raised by the world registry and controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("cannot start: no worlds are registered")]
    EmptyRegistry,

    #[error("world index {index} is out of range ({len} worlds registered)")]
    OutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reports_bounds() {
        let message = WorldError::OutOfRange { index: 7, len: 3 }.to_string();
        assert!(message.contains('7'));
        assert!(message.contains('3'));
    }
}
