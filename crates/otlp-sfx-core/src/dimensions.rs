//! Resource attributes -> dimensions.

use otlp_sfx_protocol::Dimension;

use crate::model::Resource;

pub const ATTRIBUTE_CLOUD_PROVIDER: &str = "cloud.provider";
pub const ATTRIBUTE_CLOUD_ACCOUNT_ID: &str = "cloud.account.id";
pub const ATTRIBUTE_CLOUD_REGION: &str = "cloud.region";
pub const ATTRIBUTE_HOST_ID: &str = "host.id";
/// Ingest token attached to a resource by upstream receivers. Never forwarded.
pub const ATTRIBUTE_ACCESS_TOKEN: &str = "com.splunk.signalfx.access_token";

const CLOUD_PROVIDER_AWS: &str = "aws";
const CLOUD_PROVIDER_GCP: &str = "gcp";

pub const AWS_UNIQUE_ID_DIMENSION: &str = "AWSUniqueId";
pub const GCP_ID_DIMENSION: &str = "gcp_id";

/// Builds the dimensions describing a resource.
///
/// When the resource identifies an AWS or GCP instance, a single cloud identity
/// dimension is emitted first and replaces the attributes it was built from.
pub fn resource_dimensions(resource: &Resource) -> Vec<Dimension> {
    let account_id = resource.get_str(ATTRIBUTE_CLOUD_ACCOUNT_ID).unwrap_or_default();
    let region = resource.get_str(ATTRIBUTE_CLOUD_REGION).unwrap_or_default();
    let host_id = resource.get_str(ATTRIBUTE_HOST_ID).unwrap_or_default();
    let provider = resource.get_str(ATTRIBUTE_CLOUD_PROVIDER).unwrap_or_default();

    let mut dims = Vec::with_capacity(resource.attributes.len() + 1);
    let mut consumed: &[&str] = &[];
    match provider {
        CLOUD_PROVIDER_AWS
            if !host_id.is_empty() && !region.is_empty() && !account_id.is_empty() =>
        {
            consumed = &[
                ATTRIBUTE_CLOUD_ACCOUNT_ID,
                ATTRIBUTE_CLOUD_REGION,
                ATTRIBUTE_HOST_ID,
                ATTRIBUTE_CLOUD_PROVIDER,
            ];
            dims.push(Dimension::new(
                AWS_UNIQUE_ID_DIMENSION,
                format!("{host_id}_{region}_{account_id}"),
            ));
        }
        CLOUD_PROVIDER_GCP if !account_id.is_empty() && !host_id.is_empty() => {
            consumed = &[
                ATTRIBUTE_CLOUD_ACCOUNT_ID,
                ATTRIBUTE_HOST_ID,
                ATTRIBUTE_CLOUD_PROVIDER,
            ];
            dims.push(Dimension::new(
                GCP_ID_DIMENSION,
                format!("{account_id}_{host_id}"),
            ));
        }
        _ => {}
    }

    dims.extend(
        resource
            .attributes
            .iter()
            .filter(|(k, _)| k != ATTRIBUTE_ACCESS_TOKEN && !consumed.contains(&k.as_str()))
            .map(|(k, v)| Dimension::new(k.as_str(), v.to_string())),
    );
    dims
}
