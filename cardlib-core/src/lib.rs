//! Card sequences, k-subset enumeration and table-driven poker hand
//! evaluation.
//!
//! ```
//! use cardlib_core::prelude::*;
//!
//! let hand = CardSequence::parse(5, "As Ks Qs Js Ts").unwrap();
//! let info = PokerEvaluator::hand_info(&hand, None);
//! assert_eq!(info.value(), 1);
//! assert_eq!(info.to_string(), "Royal Flush");
//! ```

pub mod cardlib;
pub mod prelude;
