//! System-wide constants for the OpenMint factory.

/// Delay between committing and applying an ownership transfer: 3 days.
pub const TRANSFER_DELAY_SECS: i64 = 3 * 24 * 60 * 60;

/// Condition-override value meaning "no override set".
pub const OVERRIDE_UNSET: u64 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_delay_is_three_days() {
        assert_eq!(TRANSFER_DELAY_SECS, 259_200);
    }
}
