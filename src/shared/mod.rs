//! Pieces of the request pipeline that don't depend on the execution flavour.
use crate::parser::unwrap_array;
use crate::{FailurePolicy, GeocoderConfig, GeocodingError, ResponseParser};

/// The result of one fetch-and-decode round trip, before classification.
///
/// `Ok(None)` means the round trip went through but the parser holds nothing usable.
pub(crate) type Fetched<T> = Result<Option<T>, GeocodingError>;

/// Hand a response body to the decode target
pub(crate) fn decode_body<P>(
    target: &mut P,
    body: &[u8],
    config: &GeocoderConfig,
) -> Result<(), GeocodingError>
where
    P: ResponseParser,
{
    let payload = if config.unwrap_array {
        unwrap_array(body)
    } else {
        body
    };
    target.decode(payload)
}

/// Read the value out of the decode target once the round trip is over.
///
/// Under `FailurePolicy::Absorb` a failed round trip still reads whatever the
/// parser managed to decode, which for a failed request is nothing.
pub(crate) fn extract<P, T>(
    target: &P,
    round_trip: Result<(), GeocodingError>,
    extract: fn(&P) -> Option<T>,
    policy: FailurePolicy,
) -> Fetched<T> {
    match round_trip {
        Ok(()) => Ok(extract(target)),
        Err(err) => match policy {
            FailurePolicy::Surface => {
                log::debug!("Geocoding round trip failed: {}", err);
                Err(err)
            }
            FailurePolicy::Absorb => {
                log::warn!("Ignoring failed geocoding round trip: {}", err);
                Ok(extract(target))
            }
        },
    }
}

/// Turn "nothing usable" into `NoResult`
pub(crate) fn classify<T>(fetched: Fetched<T>) -> Result<T, GeocodingError> {
    match fetched {
        Ok(Some(value)) => Ok(value),
        Ok(None) => {
            log::debug!("Provider returned no result");
            Err(GeocodingError::NoResult)
        }
        Err(err) => Err(err),
    }
}
