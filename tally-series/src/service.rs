use crate::record::{samples_from_reverse_reply, Sample, TimestampMs};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use redis::aio::MultiplexedConnection;
use redis::{Client, Cmd};

/// Retention of 0 disables expiry for the series.
const RETENTION_FOREVER_MS: u64 = 0;

/// Append-only, time-ordered storage for samples keyed by series name.
#[async_trait]
pub trait SampleStore {
    /// Append `sample` to the series `key`, creating the series if needed.
    async fn append(&self, key: &str, sample: Sample) -> Result<()>;

    /// Return up to `count` of the most recent samples, oldest first.
    /// A series that does not exist yet yields an empty Vec.
    async fn latest(&self, key: &str, count: usize) -> Result<Vec<Sample>>;
}

/// RedisTimeSeries backed store. One connection is opened and reused.
#[derive(Clone)]
pub struct Service {
    conn: MultiplexedConnection,
}

impl Service {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).with_context(|| format!("invalid redis url {url}"))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        debug!("connected to {url}");

        Ok(Self::new(conn))
    }
}

#[async_trait]
impl SampleStore for Service {
    async fn append(&self, key: &str, sample: Sample) -> Result<()> {
        let mut conn = self.conn.clone();
        let stored: TimestampMs = add_cmd(key, &sample)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("TS.ADD into {key} failed"))?;
        debug!("TS.ADD {key} acknowledged timestamp {stored}");

        Ok(())
    }

    async fn latest(&self, key: &str, count: usize) -> Result<Vec<Sample>> {
        let mut conn = self.conn.clone();
        let exists: bool = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("EXISTS {key} failed"))?;
        if !exists {
            return Ok(vec![]);
        }

        let rows: Vec<(TimestampMs, String)> = latest_cmd(key, count)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("TS.REVRANGE on {key} failed"))?;
        let samples = samples_from_reverse_reply(rows)?;
        debug!("read {} samples from {key}", samples.len());

        Ok(samples)
    }
}

/// `TS.ADD key ts value RETENTION 0`
fn add_cmd(key: &str, sample: &Sample) -> Cmd {
    let mut cmd = redis::cmd("TS.ADD");
    cmd.arg(key)
        .arg(sample.timestamp_ms)
        .arg(sample.value)
        .arg("RETENTION")
        .arg(RETENTION_FOREVER_MS);
    cmd
}

/// `TS.REVRANGE key - + COUNT n`, newest first so COUNT keeps the most recent.
fn latest_cmd(key: &str, count: usize) -> Cmd {
    let mut cmd = redis::cmd("TS.REVRANGE");
    cmd.arg(key).arg("-").arg("+").arg("COUNT").arg(count);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed_args(cmd: &Cmd) -> Vec<String> {
        let packed = String::from_utf8(cmd.get_packed_command()).unwrap();
        // RESP array of bulk strings: keep the payload lines only.
        packed
            .split("\r\n")
            .filter(|line| !line.is_empty() && !line.starts_with('*') && !line.starts_with('$'))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn add_disables_retention() {
        let args = packed_args(&add_cmd("total", &Sample::new(1_718_000_000_000, 42.0)));

        assert_eq!(args[0], "TS.ADD");
        assert_eq!(args[1], "total");
        assert_eq!(args[2], "1718000000000");
        assert_eq!(args[3].parse::<f64>().unwrap(), 42.0);
        assert_eq!(&args[4..], ["RETENTION", "0"]);
    }

    #[test]
    fn latest_reads_newest_first_with_count() {
        let args = packed_args(&latest_cmd("total", 10));
        assert_eq!(args, ["TS.REVRANGE", "total", "-", "+", "COUNT", "10"]);
    }
}
