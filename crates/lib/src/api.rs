use anyhow::Context;
use log::debug;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::{
    Coordinates, Government, GovernmentId, InquireReservation, Office, OfficeAgenda, OfficeId,
    ReservationClassification, ReservationConfirmation, ReservationRequest, ReservationType,
    VersionInfo, VipFlag,
};
use crate::repository::{Repository, endpoints};

pub const STATUS_OK: &str = "200";
pub const STATUS_NATIONAL_ID_VALID: &str = "1";

/// Response envelope shared by every endpoint.
#[derive(Deserialize, Debug)]
pub struct NetEnvelope<T> {
    #[serde(
        rename = "statusCode",
        alias = "responseStatus",
        deserialize_with = "status_code_string",
        default
    )]
    pub status_code: String,
    #[serde(rename = "description", default)]
    pub description: String,
    #[serde(rename = "data")]
    pub data: Option<T>,
}

/// The backend is inconsistent about quoting status codes.
fn status_code_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) => code,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl<T> NetEnvelope<T> {
    pub fn has_status(&self, code: &str) -> bool {
        self.status_code.trim() == code
    }

    /// Returns the payload when the envelope carries `success_code`,
    /// otherwise the server's own description as a domain error.
    pub fn into_data(self, success_code: &str) -> Result<Option<T>> {
        if self.has_status(success_code) {
            Ok(self.data)
        } else {
            Err(Error::domain(self.status_code, self.description))
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct NetOrgUnitStatusData {
    #[serde(rename = "orgUnitId")]
    pub org_unit_id: u32,
    #[serde(rename = "orgUnitName")]
    pub org_unit_name: String,
    #[serde(rename = "address", default)]
    pub address: Option<String>,
    #[serde(rename = "governmentId", default)]
    pub government_id: Option<u32>,
    #[serde(rename = "latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "longitude", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "vipFlag", default)]
    pub vip_flag: VipFlag,
}

impl From<NetOrgUnitStatusData> for Office {
    fn from(net: NetOrgUnitStatusData) -> Self {
        let location = match (net.latitude, net.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Office {
            id: OfficeId(net.org_unit_id),
            name: net.org_unit_name,
            address: net.address.unwrap_or_default(),
            government_id: net.government_id.map(GovernmentId),
            location,
            vip_flag: net.vip_flag,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct NetGovernmentData {
    #[serde(rename = "governmentId")]
    pub government_id: u32,
    #[serde(rename = "governmentName")]
    pub government_name: String,
}

impl From<NetGovernmentData> for Government {
    fn from(net: NetGovernmentData) -> Self {
        Government {
            id: GovernmentId(net.government_id),
            name: net.government_name,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct NetReservationCreated {
    #[serde(rename = "queId", default)]
    pub que_id: Option<Value>,
}

/// Typed access to the backend endpoints on top of a [`Repository`].
///
/// Offices and governments are cached after the first successful fetch and
/// kept until [`TawseekApi::clear_cache`] is called.
pub struct TawseekApi<R> {
    repo: R,
    offices: Mutex<Option<Vec<Office>>>,
    governments: Mutex<Option<Vec<Government>>>,
}

impl<R: Repository> TawseekApi<R> {
    pub fn new(repo: R) -> Self {
        TawseekApi {
            repo,
            offices: Mutex::new(None),
            governments: Mutex::new(None),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> Result<NetEnvelope<T>> {
        Ok(serde_json::from_value(value)
            .with_context(|| format!("Decoding {operation} response"))?)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let value = self.repo.get(path).await?;
        Self::decode::<T>(path, value)?.into_data(STATUS_OK)
    }

    async fn post_data<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Option<T>> {
        let value = self.repo.post(path, body, true).await?;
        Self::decode::<T>(path, value)?.into_data(STATUS_OK)
    }

    pub async fn version_info(&self) -> Result<VersionInfo> {
        self.get_data::<VersionInfo>(endpoints::VERSION_CHECK)
            .await?
            .ok_or_else(|| Error::domain(STATUS_OK, "version check returned no data"))
    }

    pub async fn offices(&self) -> Result<Vec<Office>> {
        let mut cache = self.offices.lock().await;
        if let Some(offices) = cache.as_ref() {
            debug!("offices: serving {} cached entries", offices.len());
            return Ok(offices.clone());
        }

        let offices: Vec<Office> = self
            .get_data::<Vec<NetOrgUnitStatusData>>(endpoints::OFFICES)
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(Office::from)
            .collect();
        *cache = Some(offices.clone());
        Ok(offices)
    }

    pub async fn governments(&self) -> Result<Vec<Government>> {
        let mut cache = self.governments.lock().await;
        if let Some(governments) = cache.as_ref() {
            debug!("governments: serving {} cached entries", governments.len());
            return Ok(governments.clone());
        }

        let governments: Vec<Government> = self
            .get_data::<Vec<NetGovernmentData>>(endpoints::GOVERNMENTS)
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(Government::from)
            .collect();
        *cache = Some(governments.clone());
        Ok(governments)
    }

    pub async fn clear_cache(&self) {
        *self.offices.lock().await = None;
        *self.governments.lock().await = None;
    }

    pub async fn office(&self, office_id: OfficeId) -> Result<Option<Office>> {
        Ok(self
            .offices()
            .await?
            .into_iter()
            .find(|office| office.id == office_id))
    }

    /// Raw national ID check; the caller interprets the status code.
    pub async fn validate_national_id(&self, national_id: &str) -> Result<NetEnvelope<Value>> {
        let value = self
            .repo
            .post(
                endpoints::VALIDATE_NATIONAL_ID,
                json!({ "nationalId": national_id }),
                true,
            )
            .await?;
        Self::decode(endpoints::VALIDATE_NATIONAL_ID, value)
    }

    pub async fn classifications(
        &self,
        office_id: OfficeId,
    ) -> Result<Vec<ReservationClassification>> {
        Ok(self
            .post_data(
                endpoints::CATEGORIES_BY_OFFICE,
                json!({ "orgUnitId": office_id.0 }),
            )
            .await?
            .unwrap_or_default())
    }

    pub async fn types(
        &self,
        office_id: OfficeId,
        category_code: &str,
    ) -> Result<Vec<ReservationType>> {
        Ok(self
            .post_data(
                endpoints::TYPES_BY_CATEGORY,
                json!({ "orgUnitId": office_id.0, "categoryCode": category_code }),
            )
            .await?
            .unwrap_or_default())
    }

    pub async fn agenda(
        &self,
        office_id: OfficeId,
        category_code: &str,
        type_code: &str,
    ) -> Result<OfficeAgenda> {
        Ok(self
            .post_data(
                endpoints::OFFICE_AGENDA,
                json!({
                    "orgUnitId": office_id.0,
                    "categoryCode": category_code,
                    "typeCode": type_code,
                }),
            )
            .await?
            .unwrap_or_default())
    }

    pub async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation> {
        let body = serde_json::to_value(request).context("Encoding reservation request")?;
        let value = self
            .repo
            .post(endpoints::CREATE_RESERVATION, body, true)
            .await?;
        let envelope = Self::decode::<NetReservationCreated>(endpoints::CREATE_RESERVATION, value)?;
        let message = envelope.description.clone();
        let created = envelope.into_data(STATUS_OK)?.unwrap_or_default();

        Ok(ReservationConfirmation {
            que_id: created.que_id.and_then(|id| match id {
                Value::String(id) => Some(id),
                Value::Null => None,
                other => Some(other.to_string()),
            }),
            message,
        })
    }

    /// Raw inquiry by national ID; the caller interprets the status code.
    pub async fn inquire_reservations(
        &self,
        national_id: &str,
    ) -> Result<NetEnvelope<Vec<InquireReservation>>> {
        let value = self
            .repo
            .post(
                endpoints::INQUIRE_RESERVATIONS,
                json!({ "nationalId": national_id }),
                true,
            )
            .await?;
        Self::decode(endpoints::INQUIRE_RESERVATIONS, value)
    }
}
