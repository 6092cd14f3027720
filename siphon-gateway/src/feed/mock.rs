use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use siphon_core::protocol::BLOCK_SIZE;
use siphon_core::protocol::cipher::{encrypt_cbc, encrypt_ecb};
use siphon_core::protocol::envelope::RawEnvelope;
use siphon_core::protocol::keys::{DEFAULT_KEY, derive_key};

use super::{FeedUpload, UploadFeed};

/// Simulated device that emits encrypted uploads on an interval.
///
/// Uploads rotate through cipher modes and keys the way captured firmware
/// does after re-pairing, so the gateway's whole candidate search stays
/// exercised without a physical device on the network.
pub struct MockDeviceFeed {
    /// Identity the simulated device reports out-of-band.
    device_identity: Box<str>,
    /// Interval between synthetic uploads.
    interval: Duration,
}

impl MockDeviceFeed {
    pub fn new(device_identity: impl Into<Box<str>>, interval_secs: u64) -> Self {
        Self {
            device_identity: device_identity.into(),
            interval: Duration::from_secs(interval_secs),
        }
    }
}

/// In-range raw fields for one synthetic payload.
fn generate_plaintext() -> [u8; 12] {
    let mut rng = rand::rng();
    let fields: [u16; 6] = [
        rng.random_range(6600..7800), // 16–28 °C
        rng.random_range(2500..7000), // 25–70 %
        rng.random_range(5..400),     // lux
        rng.random_range(1500..7000), // 15–70 dB
        rng.random_range(500..9000),  // 5–90 aqi
        rng.random_range(20..600),    // 2–60 µg/m³
    ];

    let mut plaintext = [0u8; 12];
    for (i, field) in fields.iter().enumerate() {
        plaintext[i * 2..i * 2 + 2].copy_from_slice(&field.to_le_bytes());
    }
    plaintext
}

fn build_upload(device_identity: &str, sequence: u64) -> Vec<u8> {
    let plaintext = generate_plaintext();

    let key = if sequence % 4 == 3 {
        DEFAULT_KEY
    } else {
        derive_key(device_identity)
    };

    let payload = if sequence % 2 == 1 {
        let iv: [u8; BLOCK_SIZE] = rand::rng().random();
        encrypt_cbc(key, iv, &plaintext)
    } else {
        encrypt_ecb(key, &plaintext)
    };

    RawEnvelope {
        version: Some(2),
        timestamp_millis: Some(Timestamp::now().as_millisecond() as u64),
        payload,
    }
    .to_bytes()
}

#[async_trait]
impl UploadFeed for MockDeviceFeed {
    type Error = std::convert::Infallible;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<FeedUpload>, Self::Error> {
        let (tx, rx) = mpsc::channel(16);

        let device_identity = self.device_identity.clone();
        let interval = self.interval;

        info!(
            device_id = %device_identity,
            interval_secs = interval.as_secs(),
            "Starting mock device feed"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut sequence = 0u64;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Mock device feed shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let body = build_upload(&device_identity, sequence);
                        sequence += 1;

                        let upload = FeedUpload {
                            device_identity: Some(device_identity.clone()),
                            body,
                        };
                        if tx.send(upload).await.is_err() {
                            info!("Channel closed, mock device feed shutting down");
                            return;
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
