//! Restricts where a user may connect from.

use super::{AuthenticationError, CredentialRecord, Field, Protocol};
use ipnet::IpNet;
use serde_json::Value;
use std::net::IpAddr;

/// Checks the client's source IP against the `AcceptedIpNetwork` field of the record.
///
/// Without such a field every source is accepted. A field that can't be parsed as a network
/// rejects every source.
pub fn check_source_ip(record: &CredentialRecord, source_ip: &str, protocol: &Protocol) -> Result<(), AuthenticationError> {
    let network = match record.resolve(Field::AcceptedIpNetwork, protocol) {
        None => {
            tracing::debug!("no IP range provided, skipping IP check");
            return Ok(());
        }
        Some(Value::String(s)) => parse_network(s)?,
        Some(other) => return Err(AuthenticationError::InvalidNetwork(other.to_string())),
    };

    let ip: IpAddr = source_ip
        .trim()
        .parse()
        .map_err(|_| AuthenticationError::InvalidSourceIp(source_ip.to_string()))?;

    if network.contains(&ip) {
        tracing::debug!(%ip, %network, "source IP address match");
        Ok(())
    } else {
        Err(AuthenticationError::SourceIpRejected {
            ip: ip.to_string(),
            network,
        })
    }
}

/// Parses a network in CIDR notation. A bare address is taken as a single host network. Host bits
/// must be zero: `10.0.0.1/24` is refused rather than silently widened to `10.0.0.0/24`.
pub fn parse_network(s: &str) -> Result<IpNet, AuthenticationError> {
    let s = s.trim();
    let network = match s.parse::<IpNet>() {
        Ok(network) => network,
        Err(_) => s
            .parse::<IpAddr>()
            .map(IpNet::from)
            .map_err(|_| AuthenticationError::InvalidNetwork(s.to_string()))?,
    };
    if network.trunc() != network {
        return Err(AuthenticationError::InvalidNetwork(s.to_string()));
    }
    Ok(network)
}
