use chrono::{DateTime, TimeZone, Utc};
use polars::prelude::*;

use crate::errors::DataError;

const FORMAT: &str = "merit_l0";
const MAGIC: [u8; 4] = *b"MRT0";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 16;

/// A decoded L0 telemetry file: the file epoch from the header plus the
/// packet stream in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L0File {
    pub epoch: DateTime<Utc>,
    pub packets: Vec<L0Packet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L0Packet {
    pub seq: u32,
    pub offset_ms: u32,
    pub counts: Vec<u16>,
}

fn packet_len(channel_count: usize) -> usize {
    // seq + offset_ms + counts + checksum
    4 + 4 + 2 * channel_count + 2
}

fn checksum(body: &[u8]) -> u16 {
    body.iter().fold(0u16, |acc, b| acc.wrapping_add(*b as u16))
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(&bytes[offset..offset + 2]);
    u16::from_le_bytes(buf)
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn u64_at(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

pub fn decode(bytes: &[u8]) -> Result<L0File, DataError> {
    if bytes.len() < HEADER_LEN {
        return Err(DataError::Truncated {
            format: FORMAT,
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    if bytes[0..4] != MAGIC {
        return Err(DataError::FormatMismatch {
            format: FORMAT,
            reason: format!("bad magic {:02x?}", &bytes[0..4]),
        });
    }

    let version = bytes[4];
    if version != FORMAT_VERSION {
        return Err(DataError::FormatMismatch {
            format: FORMAT,
            reason: format!("unsupported format version {version}"),
        });
    }

    let channel_count = bytes[5] as usize;
    if channel_count == 0 {
        return Err(DataError::FormatMismatch {
            format: FORMAT,
            reason: "header declares zero channels".to_string(),
        });
    }

    let epoch_secs = u64_at(bytes, 8);
    let epoch = Utc
        .timestamp_opt(epoch_secs as i64, 0)
        .single()
        .ok_or_else(|| DataError::FormatMismatch {
            format: FORMAT,
            reason: format!("epoch {epoch_secs} out of range"),
        })?;

    let body = &bytes[HEADER_LEN..];
    let plen = packet_len(channel_count);
    if body.len() % plen != 0 {
        let whole = body.len() / plen;
        return Err(DataError::Truncated {
            format: FORMAT,
            expected: HEADER_LEN + (whole + 1) * plen,
            actual: bytes.len(),
        });
    }

    let mut packets = Vec::with_capacity(body.len() / plen);
    for (index, raw) in body.chunks_exact(plen).enumerate() {
        let payload = &raw[..plen - 2];
        let expected = u16_at(raw, plen - 2);
        let computed = checksum(payload);
        if expected != computed {
            return Err(DataError::ChecksumMismatch {
                index,
                expected,
                computed,
            });
        }

        let seq = u32_at(raw, 0);
        let offset_ms = u32_at(raw, 4);
        let mut counts = Vec::with_capacity(channel_count);
        for ch in 0..channel_count {
            counts.push(u16_at(raw, 8 + 2 * ch));
        }

        packets.push(L0Packet {
            seq,
            offset_ms,
            counts,
        });
    }

    if packets.is_empty() {
        return Err(DataError::EmptyData { format: FORMAT });
    }

    Ok(L0File { epoch, packets })
}

/// Encode packets into the L0 physical format. Used by the ground-support
/// synthesizer and test fixtures; flight data arrives already encoded.
pub fn encode(
    epoch: DateTime<Utc>,
    channel_count: u8,
    packets: &[L0Packet],
) -> Result<Vec<u8>, DataError> {
    if channel_count == 0 {
        return Err(DataError::FormatMismatch {
            format: FORMAT,
            reason: "cannot encode a file with zero channels".to_string(),
        });
    }

    let epoch_secs = epoch.timestamp();
    if epoch_secs < 0 {
        return Err(DataError::FormatMismatch {
            format: FORMAT,
            reason: format!("epoch {epoch} predates the unsigned header epoch"),
        });
    }

    let plen = packet_len(channel_count as usize);
    let mut out = Vec::with_capacity(HEADER_LEN + plen * packets.len());
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);
    out.push(channel_count);
    out.extend_from_slice(&[0u8; 2]);
    out.extend_from_slice(&(epoch_secs as u64).to_le_bytes());

    for packet in packets {
        if packet.counts.len() != channel_count as usize {
            return Err(DataError::FormatMismatch {
                format: FORMAT,
                reason: format!(
                    "packet {} carries {} channels, header declares {channel_count}",
                    packet.seq,
                    packet.counts.len()
                ),
            });
        }

        let start = out.len();
        out.extend_from_slice(&packet.seq.to_le_bytes());
        out.extend_from_slice(&packet.offset_ms.to_le_bytes());
        for count in &packet.counts {
            out.extend_from_slice(&count.to_le_bytes());
        }
        let sum = checksum(&out[start..]);
        out.extend_from_slice(&sum.to_le_bytes());
    }

    Ok(out)
}

pub fn channel_column_name(channel: usize) -> String {
    format!("counts_ch{channel:02}")
}

/// Build the measurement frame: `timestamp` (datetime, microseconds), `seq`,
/// and one integer column per channel.
pub fn to_dataframe(file: &L0File) -> Result<DataFrame, DataError> {
    let channel_count = file
        .packets
        .first()
        .map(|p| p.counts.len())
        .unwrap_or_default();

    let epoch_micros = file.epoch.timestamp() * 1_000_000;
    let mut timestamps: Vec<i64> = Vec::with_capacity(file.packets.len());
    let mut seqs: Vec<i64> = Vec::with_capacity(file.packets.len());
    let mut channels: Vec<Vec<i64>> = (0..channel_count)
        .map(|_| Vec::with_capacity(file.packets.len()))
        .collect();

    for packet in &file.packets {
        timestamps.push(epoch_micros + i64::from(packet.offset_ms) * 1_000);
        seqs.push(i64::from(packet.seq));
        for (ch, count) in packet.counts.iter().enumerate() {
            channels[ch].push(i64::from(*count));
        }
    }

    let ts_series =
        Series::new("timestamp".into(), timestamps).cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let mut cols: Vec<Column> = Vec::with_capacity(2 + channel_count);
    cols.push(ts_series.into());
    cols.push(Series::new("seq".into(), seqs).into());
    for (ch, values) in channels.into_iter().enumerate() {
        cols.push(Series::new(channel_column_name(ch).into(), values).into());
    }

    Ok(DataFrame::new(cols)?)
}
