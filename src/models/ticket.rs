//! Ticket enumerations used by the Freshdesk API.
//!
//! Freshdesk encodes ticket status, priority and source as small integers.
//! Helpdesks may add their own statuses (6 and up) and sources, so only
//! priority is a closed set. These types let tool inputs be checked before
//! a request is sent; the API has the last word on custom codes.

use crate::error::FreshdeskError;

/// Ticket status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    /// 2
    Open,
    /// 3
    Pending,
    /// 4
    Resolved,
    /// 5
    Closed,
    /// A helpdesk-defined status, 6 or above.
    Custom(u8),
}

impl TryFrom<u8> for TicketStatus {
    type Error = FreshdeskError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            2 => Ok(TicketStatus::Open),
            3 => Ok(TicketStatus::Pending),
            4 => Ok(TicketStatus::Resolved),
            5 => Ok(TicketStatus::Closed),
            6.. => Ok(TicketStatus::Custom(code)),
            other => Err(FreshdeskError::validation(format!(
                "status must be 2=Open, 3=Pending, 4=Resolved, 5=Closed or a custom status (6 and above), got: {}",
                other
            ))),
        }
    }
}

/// Ticket priority codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketPriority {
    /// 1
    Low,
    /// 2
    Medium,
    /// 3
    High,
    /// 4
    Urgent,
}

impl TryFrom<u8> for TicketPriority {
    type Error = FreshdeskError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(TicketPriority::Low),
            2 => Ok(TicketPriority::Medium),
            3 => Ok(TicketPriority::High),
            4 => Ok(TicketPriority::Urgent),
            other => Err(FreshdeskError::validation(format!(
                "priority must be one of 1=Low, 2=Medium, 3=High, 4=Urgent, got: {}",
                other
            ))),
        }
    }
}

/// Channel a ticket was raised through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSource {
    /// 1
    Email,
    /// 2
    Portal,
    /// 3
    Phone,
    /// 7
    Chat,
    /// 9
    FeedbackWidget,
    /// 10
    OutboundEmail,
    /// Any other nonzero code, including helpdesk-defined sources.
    Other(u8),
}

impl TryFrom<u8> for TicketSource {
    type Error = FreshdeskError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Err(FreshdeskError::validation(
                "source must be a nonzero code (1=Email, 2=Portal, 3=Phone, 7=Chat, 9=Feedback Widget, 10=Outbound Email, or a custom source)",
            )),
            1 => Ok(TicketSource::Email),
            2 => Ok(TicketSource::Portal),
            3 => Ok(TicketSource::Phone),
            7 => Ok(TicketSource::Chat),
            9 => Ok(TicketSource::FeedbackWidget),
            10 => Ok(TicketSource::OutboundEmail),
            other => Ok(TicketSource::Other(other)),
        }
    }
}
