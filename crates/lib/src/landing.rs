use log::{info, warn};
use serde::Serialize;

use crate::api::TawseekApi;
use crate::error::Result;
use crate::model::{Government, Office, Platform};
use crate::repository::Repository;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum LandingOutcome {
    /// The installed build is older than the server accepts.
    UpdateRequired { installed: u32, required: u32 },
    /// Startup can continue. Either list is empty if its fetch failed.
    Ready {
        offices: Vec<Office>,
        governments: Vec<Government>,
    },
}

impl LandingOutcome {
    pub fn offices(&self) -> &[Office] {
        match self {
            LandingOutcome::Ready { offices, .. } => offices,
            LandingOutcome::UpdateRequired { .. } => &[],
        }
    }

    pub fn governments(&self) -> &[Government] {
        match self {
            LandingOutcome::Ready { governments, .. } => governments,
            LandingOutcome::UpdateRequired { .. } => &[],
        }
    }
}

/// App startup: version gate, then both lookup lists.
pub struct LandingBootstrap<'a, R> {
    api: &'a TawseekApi<R>,
}

impl<'a, R: Repository> LandingBootstrap<'a, R> {
    pub fn new(api: &'a TawseekApi<R>) -> Self {
        LandingBootstrap { api }
    }

    /// Only a failed version check fails the bootstrap. The offices and
    /// governments fetches run concurrently and a failure in either one
    /// just leaves that list empty.
    pub async fn run(&self, installed_version: u32, platform: Platform) -> Result<LandingOutcome> {
        let version = self.api.version_info().await?;
        let required = version.required_for(platform);
        if installed_version < required {
            info!("Installed version {installed_version} is below required {required}");
            return Ok(LandingOutcome::UpdateRequired {
                installed: installed_version,
                required,
            });
        }

        let (offices, governments) = tokio::join!(self.api.offices(), self.api.governments());
        let offices = offices.unwrap_or_else(|err| {
            warn!("Loading offices failed: {err}");
            Vec::new()
        });
        let governments = governments.unwrap_or_else(|err| {
            warn!("Loading governments failed: {err}");
            Vec::new()
        });

        info!(
            "Landing ready with {} offices and {} governments",
            offices.len(),
            governments.len()
        );
        Ok(LandingOutcome::Ready {
            offices,
            governments,
        })
    }
}
