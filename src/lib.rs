pub mod assumer;
pub mod context;
pub mod credentials;
pub mod error;
pub mod federation;
pub mod handler;
pub mod mfa;
pub mod profile;
pub mod region;
pub mod registry;
pub mod run;

#[cfg(test)]
pub(crate) mod testing;

pub mod defaults {
    pub const DURATION_SECONDS: i32 = 3600;
    pub const REGION: &str = "us-east-1";
    pub const FEDERATION_SESSION_PREFIX: &str = "Assumers@";
}
