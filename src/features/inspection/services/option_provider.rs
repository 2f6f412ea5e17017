use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::features::inspection::error::InspectionError;

/// Choices for the equipment and location dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownOptions {
    pub locations: Vec<String>,
    pub equipments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    locations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EquipmentsResponse {
    equipments: Vec<String>,
}

/// Loads dropdown choices from the workflow endpoint
pub struct OptionProvider {
    http_client: Client,
    options_url: String,
}

impl OptionProvider {
    pub fn new(http_client: Client, options_url: impl Into<String>) -> Self {
        Self {
            http_client,
            options_url: options_url.into(),
        }
    }

    /// Fetch both lists; on any failure both stay empty
    pub async fn load(&self) -> DropdownOptions {
        let started = Instant::now();

        match self.fetch().await {
            Ok(options) => {
                info!(
                    "Loaded {} locations and {} equipments in {}ms",
                    options.locations.len(),
                    options.equipments.len(),
                    started.elapsed().as_millis()
                );
                options
            }
            Err(e) => {
                warn!("{} (after {}ms)", e, started.elapsed().as_millis());
                DropdownOptions::default()
            }
        }
    }

    /// Both requests run concurrently
    pub async fn fetch(&self) -> Result<DropdownOptions, InspectionError> {
        let (locations, equipments) = tokio::try_join!(
            self.fetch_list::<LocationsResponse>("locations"),
            self.fetch_list::<EquipmentsResponse>("equipments"),
        )?;

        Ok(DropdownOptions {
            locations: locations.locations,
            equipments: equipments.equipments,
        })
    }

    async fn fetch_list<T: DeserializeOwned>(&self, kind: &str) -> Result<T, InspectionError> {
        let response = self
            .http_client
            .get(&self.options_url)
            .query(&[("type", kind)])
            .send()
            .await
            .map_err(|e| InspectionError::OptionFetch(format!("{}: {}", kind, e)))?;

        if !response.status().is_success() {
            return Err(InspectionError::OptionFetch(format!(
                "{}: HTTP {}",
                kind,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| InspectionError::OptionFetch(format!("{}: {}", kind, e)))
    }
}
