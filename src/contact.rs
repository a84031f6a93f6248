//! Contact form state machine.
//!
//! `Idle -> Submitting -> Success | Error`, and from either outcome back to
//! `Submitting` on the next submit. While a request is in flight further
//! submits are ignored.

use crate::mail::{MailError, MailMessage, MailTransport};

pub const IDLE_BUTTON_LABEL: &str = "Send message";
pub const IDLE_BUTTON_ICON: &str = "fas fa-paper-plane";
pub const PENDING_BUTTON_LABEL: &str = "Sending...";
pub const PENDING_BUTTON_ICON: &str = "fas fa-spinner";

const PENDING_STATUS: &str = "Sending your message...";
const SUCCESS_STATUS: &str = "Message sent! I will get back to you soon.";
const ERROR_STATUS: &str = "Something went wrong while sending. Please try again or email me directly.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.from_name,
            ContactField::Email => &self.from_email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
        }
    }

    fn slot(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.from_name,
            ContactField::Email => &mut self.from_email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
        }
    }

    /// Values are sent verbatim; the browser's `required` attributes are the
    /// only validation.
    pub fn to_message(&self, recipient: &str) -> MailMessage {
        MailMessage {
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            to_email: recipient.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContactAction {
    Edit(ContactField, String),
    Begin,
    Complete(Result<(), MailError>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub icon: &'static str,
    pub loading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub class: &'static str,
    pub text: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactForm {
    pub fields: ContactFields,
    pub status: FormStatus,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            fields: ContactFields::default(),
            status: FormStatus::Idle,
        }
    }
}

impl ContactForm {
    pub fn in_flight(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// Message the next submit would deliver, or `None` while a submission is
    /// pending. The form itself only changes once `ContactAction::Begin` is
    /// applied.
    pub fn prepare(&self, recipient: &str) -> Option<MailMessage> {
        (!self.in_flight()).then(|| self.fields.to_message(recipient))
    }

    pub fn complete(&mut self, outcome: Result<(), MailError>) {
        if !self.in_flight() {
            return;
        }
        match outcome {
            Ok(()) => {
                self.status = FormStatus::Success;
                self.fields = ContactFields::default();
            }
            Err(_) => self.status = FormStatus::Error,
        }
    }

    pub fn apply(&mut self, action: ContactAction) {
        match action {
            ContactAction::Edit(field, value) => *self.fields.slot(field) = value,
            ContactAction::Begin => {
                if !self.in_flight() {
                    self.status = FormStatus::Submitting;
                }
            }
            ContactAction::Complete(outcome) => self.complete(outcome),
        }
    }

    /// Spinner only while a request is pending; every outcome restores the
    /// idle button.
    pub fn button(&self) -> SubmitButton {
        if self.in_flight() {
            SubmitButton {
                label: PENDING_BUTTON_LABEL,
                icon: PENDING_BUTTON_ICON,
                loading: true,
            }
        } else {
            SubmitButton {
                label: IDLE_BUTTON_LABEL,
                icon: IDLE_BUTTON_ICON,
                loading: false,
            }
        }
    }

    pub fn status_line(&self) -> StatusLine {
        match self.status {
            FormStatus::Idle => StatusLine {
                class: "form-status",
                text: "",
            },
            FormStatus::Submitting => StatusLine {
                class: "form-status loading show",
                text: PENDING_STATUS,
            },
            FormStatus::Success => StatusLine {
                class: "form-status success show",
                text: SUCCESS_STATUS,
            },
            FormStatus::Error => StatusLine {
                class: "form-status error show",
                text: ERROR_STATUS,
            },
        }
    }
}

/// Runs one submission of `form`: dispatches `Begin`, delivers the prepared
/// message and dispatches `Complete` with the outcome. Returns `None` without
/// dispatching or sending when a submission is already pending.
pub async fn submit(
    form: &ContactForm,
    transport: &impl MailTransport,
    recipient: &str,
    dispatch: impl Fn(ContactAction),
) -> Option<Result<(), MailError>> {
    let message = form.prepare(recipient)?;
    dispatch(ContactAction::Begin);
    let outcome = transport.send(&message).await;
    dispatch(ContactAction::Complete(outcome.clone()));
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubTransport {
        outcome: Result<(), MailError>,
        sent: RefCell<Vec<MailMessage>>,
    }

    impl StubTransport {
        fn answering(outcome: Result<(), MailError>) -> Self {
            Self {
                outcome,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl MailTransport for StubTransport {
        async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
            self.sent.borrow_mut().push(message.clone());
            self.outcome.clone()
        }
    }

    fn filled_form() -> ContactForm {
        let mut form = ContactForm::default();
        form.apply(ContactAction::Edit(ContactField::Name, "Sam".to_string()));
        form.apply(ContactAction::Edit(ContactField::Email, "sam@example.com".to_string()));
        form.apply(ContactAction::Edit(ContactField::Subject, "Hi".to_string()));
        form.apply(ContactAction::Edit(ContactField::Message, "  keep spacing ".to_string()));
        form
    }

    /// Submits `form` the way the page does, folding every dispatched action
    /// back into a copy of the form. Returns the outcome, the resulting form
    /// and the dispatched actions.
    async fn run_submit(
        form: &ContactForm,
        transport: &StubTransport,
        recipient: &str,
    ) -> (Option<Result<(), MailError>>, ContactForm, Vec<ContactAction>) {
        let state = RefCell::new(form.clone());
        let actions = RefCell::new(Vec::new());

        let outcome = submit(form, transport, recipient, |action: ContactAction| {
            actions.borrow_mut().push(action.clone());
            state.borrow_mut().apply(action);
        })
        .await;

        (outcome, state.into_inner(), actions.into_inner())
    }

    #[tokio::test]
    async fn successful_delivery_clears_fields() {
        let transport = StubTransport::answering(Ok(()));
        let form = filled_form();
        assert_eq!(form.status, FormStatus::Idle);

        let (outcome, form, _) = run_submit(&form, &transport, "owner@example.com").await;

        assert_eq!(outcome, Some(Ok(())));
        assert_eq!(form.status, FormStatus::Success);
        assert_eq!(form.fields, ContactFields::default());
        assert_eq!(form.status_line().class, "form-status success show");
        assert!(!form.button().loading);

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "  keep spacing ");
        assert_eq!(sent[0].to_email, "owner@example.com");
    }

    #[tokio::test]
    async fn failed_delivery_keeps_fields() {
        let transport = StubTransport::answering(Err(MailError::Rejected(500)));
        let form = filled_form();

        let (outcome, after, _) = run_submit(&form, &transport, "owner@example.com").await;

        assert_eq!(outcome, Some(Err(MailError::Rejected(500))));
        assert_eq!(after.status, FormStatus::Error);
        assert_eq!(after.fields, form.fields);
        assert_eq!(after.status_line().class, "form-status error show");
        assert_eq!(after.button().label, IDLE_BUTTON_LABEL);
    }

    #[tokio::test]
    async fn submission_dispatches_begin_then_complete() {
        let transport = StubTransport::answering(Ok(()));
        let form = filled_form();

        let (_, _, actions) = run_submit(&form, &transport, "owner@example.com").await;

        assert_eq!(
            actions,
            vec![ContactAction::Begin, ContactAction::Complete(Ok(()))]
        );
        assert_eq!(
            transport.sent.borrow()[0],
            form.prepare("owner@example.com").expect("idle form can submit")
        );
    }

    #[test]
    fn begin_marks_form_submitting() {
        let mut form = filled_form();

        let message = form.prepare("owner@example.com").expect("idle form can submit");
        assert_eq!(message.from_name, "Sam");
        assert_eq!(message.to_email, "owner@example.com");
        assert_eq!(form.status, FormStatus::Idle);

        form.apply(ContactAction::Begin);
        assert_eq!(form.status, FormStatus::Submitting);
        assert_eq!(form.prepare("owner@example.com"), None);
        assert_eq!(
            form.button(),
            SubmitButton {
                label: PENDING_BUTTON_LABEL,
                icon: PENDING_BUTTON_ICON,
                loading: true,
            }
        );
        assert_eq!(form.status_line().class, "form-status loading show");

        form.apply(ContactAction::Complete(Ok(())));
        assert_eq!(form.status, FormStatus::Success);
    }

    #[tokio::test]
    async fn pending_submission_blocks_another() {
        let transport = StubTransport::answering(Ok(()));
        let mut form = filled_form();
        form.apply(ContactAction::Begin);

        let (outcome, after, actions) = run_submit(&form, &transport, "owner@example.com").await;

        assert_eq!(outcome, None);
        assert!(actions.is_empty());
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(after.status, FormStatus::Submitting);
    }

    #[test]
    fn late_completion_without_pending_request_is_ignored() {
        let mut form = filled_form();
        form.apply(ContactAction::Complete(Ok(())));

        assert_eq!(form.status, FormStatus::Idle);
        assert_eq!(form.fields.get(ContactField::Name), "Sam");
    }

    #[tokio::test]
    async fn error_state_can_be_retried() {
        let (_, form, _) = run_submit(
            &filled_form(),
            &StubTransport::answering(Err(MailError::Unconfigured)),
            "",
        )
        .await;
        assert_eq!(form.status, FormStatus::Error);

        let (_, form, _) =
            run_submit(&form, &StubTransport::answering(Ok(())), "owner@example.com").await;
        assert_eq!(form.status, FormStatus::Success);
    }
}
