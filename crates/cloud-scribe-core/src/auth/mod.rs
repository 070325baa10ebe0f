mod credentials;
mod token_source;

pub use {
    credentials::{Credentials, ServiceAccountKey},
    token_source::TokenSource,
};
