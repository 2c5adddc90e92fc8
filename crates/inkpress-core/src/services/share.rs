use crate::domain::Post;
use crate::forms::ShareForm;
use crate::ports::MailMessage;

/// Build the "recommended read" email for `post`, reachable at `post_url`.
///
/// The sender is left unset so the mailer applies its default address.
pub fn share_message(post: &Post, post_url: &str, form: &ShareForm) -> MailMessage {
    let subject = format!(
        "{} ({}) recommends you read {}",
        form.name, form.email, post.title
    );
    let body = format!(
        "Read {} at {}\n\n{}'s comments: {}",
        post.title, post_url, form.name, form.comments
    );

    MailMessage {
        subject,
        body,
        from: None,
        to: vec![form.to.clone()],
    }
}
