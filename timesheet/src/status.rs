use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimesheetStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl TimesheetStatus {
    /// Whether the owner may still change the entries.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }
}

/// The part an actor plays toward one particular timesheet.
///
/// The owner always acts as `Employee`, even when they hold admin rights;
/// `Admin` means an administrator looking at somebody else's week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Employee,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Save entries without submitting.
    Edit,
    Submit,
    Approve,
    Reject,
}

/// The decision recorded on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReviewAction {
    Approved,
    Rejected,
}

impl ReviewAction {
    pub fn status(&self) -> TimesheetStatus {
        match self {
            Self::Approved => TimesheetStatus::Approved,
            Self::Rejected => TimesheetStatus::Rejected,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Self::Approved => Action::Approve,
            Self::Rejected => Action::Reject,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("only the owner can {0} this timesheet")]
    NotOwner(Action),
    #[error("only an admin can {0} this timesheet")]
    NotAdmin(Action),
    #[error("the week has not ended yet")]
    WeekNotEnded,
    #[error("timesheet is {0} and can no longer be changed")]
    Locked(TimesheetStatus),
    #[error("cannot {action} a {status} timesheet")]
    InvalidTransition {
        status: TimesheetStatus,
        action: Action,
    },
}

/// Whether `role` has any forward move on a timesheet in `status`.
///
/// Owners submit drafts (and rejected weeks) once the week is over; admins
/// decide on submitted ones. Approved timesheets are final.
pub fn can_transition(status: TimesheetStatus, role: Role, week_ended: bool) -> bool {
    match (status, role) {
        (TimesheetStatus::Draft | TimesheetStatus::Rejected, Role::Employee) => week_ended,
        (TimesheetStatus::Submitted, Role::Admin) => true,
        _ => false,
    }
}

/// Checks `action` against the transition table and returns the status the
/// timesheet moves to.
pub fn check(
    status: TimesheetStatus,
    action: Action,
    role: Role,
    week_ended: bool,
) -> Result<TimesheetStatus, WorkflowError> {
    match action {
        Action::Edit | Action::Submit if role != Role::Employee => {
            Err(WorkflowError::NotOwner(action))
        }
        Action::Approve | Action::Reject if role != Role::Admin => {
            Err(WorkflowError::NotAdmin(action))
        }
        Action::Edit | Action::Submit if !status.is_editable() => {
            Err(WorkflowError::Locked(status))
        }
        Action::Edit => Ok(TimesheetStatus::Draft),
        Action::Submit if !week_ended => Err(WorkflowError::WeekNotEnded),
        Action::Submit => Ok(TimesheetStatus::Submitted),
        Action::Approve | Action::Reject if status != TimesheetStatus::Submitted => {
            Err(WorkflowError::InvalidTransition { status, action })
        }
        Action::Approve => Ok(TimesheetStatus::Approved),
        Action::Reject => Ok(TimesheetStatus::Rejected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use TimesheetStatus::*;

    #[test]
    fn employee_submits_only_after_week_end() {
        assert!(!can_transition(Draft, Role::Employee, false));
        assert!(can_transition(Draft, Role::Employee, true));
    }

    #[test]
    fn submitted_belongs_to_admins() {
        for week_ended in [false, true] {
            assert!(!can_transition(Submitted, Role::Employee, week_ended));
            assert!(can_transition(Submitted, Role::Admin, week_ended));
        }
    }

    #[test]
    fn approved_is_final() {
        for role in [Role::Employee, Role::Admin] {
            assert!(!can_transition(Approved, role, true));
        }
        assert_eq!(
            check(Approved, Action::Edit, Role::Employee, true),
            Err(WorkflowError::Locked(Approved))
        );
    }

    #[test]
    fn rejected_can_be_reworked_and_resubmitted() {
        assert!(can_transition(Rejected, Role::Employee, true));
        assert_eq!(check(Rejected, Action::Edit, Role::Employee, true), Ok(Draft));
        assert_eq!(
            check(Rejected, Action::Submit, Role::Employee, true),
            Ok(Submitted)
        );
        assert!(!can_transition(Rejected, Role::Admin, true));
    }

    #[test]
    fn check_reports_why() {
        assert_eq!(
            check(Draft, Action::Submit, Role::Employee, false),
            Err(WorkflowError::WeekNotEnded)
        );
        assert_eq!(
            check(Draft, Action::Submit, Role::Admin, true),
            Err(WorkflowError::NotOwner(Action::Submit))
        );
        assert_eq!(
            check(Submitted, Action::Approve, Role::Employee, true),
            Err(WorkflowError::NotAdmin(Action::Approve))
        );
        assert_eq!(
            check(Submitted, Action::Edit, Role::Employee, true),
            Err(WorkflowError::Locked(Submitted))
        );
        assert_eq!(
            check(Draft, Action::Reject, Role::Admin, true),
            Err(WorkflowError::InvalidTransition {
                status: Draft,
                action: Action::Reject
            })
        );
    }

    #[test]
    fn admin_decides_submitted() {
        assert_eq!(check(Submitted, Action::Approve, Role::Admin, false), Ok(Approved));
        assert_eq!(check(Submitted, Action::Reject, Role::Admin, true), Ok(Rejected));
    }

    #[test]
    fn drafts_save_any_time() {
        assert_eq!(check(Draft, Action::Edit, Role::Employee, false), Ok(Draft));
    }

    #[test]
    fn status_round_trips_as_lowercase() {
        assert_eq!(Submitted.to_string(), "submitted");
        assert_eq!("APPROVED".parse::<TimesheetStatus>().unwrap(), Approved);
        assert_eq!(serde_json::to_string(&Rejected).unwrap(), "\"rejected\"");
    }
}
