use serde::{Deserialize, Serialize};

/// Party size forwarded with every options and availability query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for Participants {
    /// A single adult, the configuration used when the visitor has not chosen one
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_adult() {
        let p = Participants::default();
        assert_eq!((p.adults, p.children, p.infants), (1, 0, 0));
    }
}
