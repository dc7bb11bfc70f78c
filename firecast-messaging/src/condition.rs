//! Topic condition expressions.
//!
//! A condition selects recipients by topic membership, e.g.
//! `'news' in topics && ('sports' in topics || 'weather' in topics)`.
//! The rendered string is sent verbatim, so the builder reproduces the
//! service grammar exactly: each term is `'<topic>' in topics`, terms are
//! joined with `&&` or `||`, and parentheses group terms.
//!
//! ```
//! use firecast_messaging::Condition;
//!
//! let condition = Condition::new("A")?
//!     .open_and("B")?
//!     .or("C")?
//!     .close_and()?;
//!
//! assert!(condition.is_valid());
//! assert_eq!(
//!     condition.render(),
//!     "'A' in topics && ('B' in topics || 'C' in topics)"
//! );
//! # Ok::<(), firecast_messaging::MessagingError>(())
//! ```

use std::fmt;

use crate::{MessagingError, Result};

/// Maximum number of topic terms in one condition.
pub const MAX_TERMS: usize = 4;

/// Builder for a topic condition expression.
///
/// Terms and groups are appended strictly in call order. There is no
/// rebalancing, so the call order is the structure of the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    expression: String,
    terms: usize,
    open_groups: usize,
}

impl Condition {
    /// Start a condition with a single topic term.
    pub fn new(topic: impl AsRef<str>) -> Result<Self> {
        let topic = topic.as_ref();
        validate_topic(topic)?;

        Ok(Self {
            expression: term(topic),
            terms: 1,
            open_groups: 0,
        })
    }

    /// Append `&& '<topic>' in topics`.
    pub fn and(self, topic: impl AsRef<str>) -> Result<Self> {
        self.push(" && ", topic.as_ref(), false)
    }

    /// Append `|| '<topic>' in topics`.
    pub fn or(self, topic: impl AsRef<str>) -> Result<Self> {
        self.push(" || ", topic.as_ref(), false)
    }

    /// Append `&& ('<topic>' in topics` and open a group.
    pub fn open_and(self, topic: impl AsRef<str>) -> Result<Self> {
        self.push(" && ", topic.as_ref(), true)
    }

    /// Append `|| ('<topic>' in topics` and open a group.
    pub fn open_or(self, topic: impl AsRef<str>) -> Result<Self> {
        self.push(" || ", topic.as_ref(), true)
    }

    /// Close the innermost group opened by [`open_and`](Self::open_and).
    pub fn close_and(self) -> Result<Self> {
        self.close()
    }

    /// Close the innermost group opened by [`open_or`](Self::open_or).
    pub fn close_or(self) -> Result<Self> {
        self.close()
    }

    /// Whether every opened group has been closed.
    ///
    /// Only grouping balance is checked.
    pub fn is_valid(&self) -> bool {
        self.open_groups == 0
    }

    /// The accumulated expression, valid or not.
    pub fn render(&self) -> &str {
        &self.expression
    }

    /// Number of topic terms, including the initial one.
    pub fn operator_count(&self) -> usize {
        self.terms
    }

    /// Number of groups still open.
    pub fn open_groups(&self) -> usize {
        self.open_groups
    }

    /// Fail unless the condition is balanced.
    pub(crate) fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MessagingError::InvalidConditionSyntax {
                open: self.open_groups,
            })
        }
    }

    fn push(mut self, operator: &str, topic: &str, open_group: bool) -> Result<Self> {
        // The budget is checked before the topic itself.
        if self.terms >= MAX_TERMS {
            return Err(MessagingError::TooManyOperators { max: MAX_TERMS });
        }
        validate_topic(topic)?;

        self.expression.push_str(operator);
        if open_group {
            self.expression.push('(');
            self.open_groups += 1;
        }
        self.expression.push_str(&term(topic));
        self.terms += 1;

        Ok(self)
    }

    fn close(mut self) -> Result<Self> {
        if self.open_groups == 0 {
            return Err(MessagingError::UnbalancedGroup);
        }

        self.expression.push(')');
        self.open_groups -= 1;

        Ok(self)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl AsRef<str> for Condition {
    fn as_ref(&self) -> &str {
        &self.expression
    }
}

fn term(topic: &str) -> String {
    format!("'{}' in topics", topic)
}

pub(crate) fn validate_topic(topic: &str) -> Result<()> {
    if topic.trim().is_empty() {
        return Err(MessagingError::InvalidTopic);
    }
    Ok(())
}
