//! User-Facing Messages
//!
//! Toast texts in the two languages the platform ships.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    LoadFailed,
    PostPublished,
    PostCreateFailed,
    PostUpdateFailed,
    PostDeleteFailed,
    CommentFailed,
    CommentDeleteFailed,
    LikeFailed,
    NotificationUpdateFailed,
    InviteSent,
    InviteFailed,
    JobCreateFailed,
    JobDeleteFailed,
    UploadFailed,
    SessionNotSaved,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        use Message::*;
        match (self, locale) {
            (LoadFailed, Locale::En) => "Could not load more items. Please try again.",
            (LoadFailed, Locale::Fr) => "Impossible de charger plus d'éléments. Veuillez réessayer.",
            (PostPublished, Locale::En) => "Your post has been published.",
            (PostPublished, Locale::Fr) => "Votre publication a été publiée.",
            (PostCreateFailed, Locale::En) => "Your post could not be published.",
            (PostCreateFailed, Locale::Fr) => "Votre publication n'a pas pu être publiée.",
            (PostUpdateFailed, Locale::En) => "Your changes could not be saved.",
            (PostUpdateFailed, Locale::Fr) => "Vos modifications n'ont pas pu être enregistrées.",
            (PostDeleteFailed, Locale::En) => "The post could not be deleted.",
            (PostDeleteFailed, Locale::Fr) => "La publication n'a pas pu être supprimée.",
            (CommentFailed, Locale::En) => "Your comment could not be posted.",
            (CommentFailed, Locale::Fr) => "Votre commentaire n'a pas pu être publié.",
            (CommentDeleteFailed, Locale::En) => "The comment could not be deleted.",
            (CommentDeleteFailed, Locale::Fr) => "Le commentaire n'a pas pu être supprimé.",
            (LikeFailed, Locale::En) => "Your reaction could not be saved.",
            (LikeFailed, Locale::Fr) => "Votre réaction n'a pas pu être enregistrée.",
            (NotificationUpdateFailed, Locale::En) => "Notifications could not be updated.",
            (NotificationUpdateFailed, Locale::Fr) => "Les notifications n'ont pas pu être mises à jour.",
            (InviteSent, Locale::En) => "Invitation sent.",
            (InviteSent, Locale::Fr) => "Invitation envoyée.",
            (InviteFailed, Locale::En) => "The invitation could not be sent.",
            (InviteFailed, Locale::Fr) => "L'invitation n'a pas pu être envoyée.",
            (JobCreateFailed, Locale::En) => "The job offer could not be created.",
            (JobCreateFailed, Locale::Fr) => "L'offre d'emploi n'a pas pu être créée.",
            (JobDeleteFailed, Locale::En) => "The job offer could not be deleted.",
            (JobDeleteFailed, Locale::Fr) => "L'offre d'emploi n'a pas pu être supprimée.",
            (UploadFailed, Locale::En) => "The file could not be uploaded.",
            (UploadFailed, Locale::Fr) => "Le fichier n'a pas pu être téléversé.",
            (SessionNotSaved, Locale::En) => "You will need to sign in again next time.",
            (SessionNotSaved, Locale::Fr) => "Vous devrez vous reconnecter la prochaine fois.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub text: String,
}

impl Toast {
    pub fn new(id: u64, level: ToastLevel, message: Message, locale: Locale) -> Self {
        Self { id, level, text: message.text(locale).to_string() }
    }
}
