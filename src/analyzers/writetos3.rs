use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Serializes a value to JSON and uploads it to an S3 bucket with
/// `application/json` content type, gzip-encoding the body when asked.
#[tracing::instrument(skip(client, value))]
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> Result<()> {
    let body = encode_json(value, gzip)?;
    let size = body.len();

    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json");
    if gzip {
        request = request.content_encoding("gzip");
    }
    request.send().await?;

    info!(size, "Uploaded JSON to S3");
    Ok(())
}

/// JSON bytes, gzip-compressed when `gzip` is set.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(value)?;
    if !gzip {
        return Ok(json);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_encode_plain_json() {
        let bytes = encode_json(&vec![1, 2, 3], false).unwrap();
        assert_eq!(bytes, b"[1,2,3]");
    }

    #[test]
    fn test_encode_gzip_json() {
        let bytes = encode_json(&vec!["a"], true).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

        let mut decoded = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, r#"["a"]"#);
    }
}
