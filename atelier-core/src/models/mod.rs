pub mod artisan;
pub mod comment;

pub use artisan::{Artisan, ArtisanFilter, ArtisanInput, ArtisanPatch, ArtisanWithComments, NewArtisan};
pub use comment::{Comment, CommentInput, CommentPatch, CommentSummary, NewComment};
