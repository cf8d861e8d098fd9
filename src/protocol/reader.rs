//! Exact-read abstraction over any byte source.
//!
//! Stream transports may return fewer bytes than requested from a single
//! read, so every codec decodes through [`FrameReader`], which loops until
//! the requested count is satisfied. A zero-length read before that point
//! means the peer closed the stream and surfaces as
//! [`WirecallError::ConnectionClosed`] — never as a short buffer.
//!
//! The reader is generic over `AsyncRead`, so the same codecs run against a
//! `TcpStream` half, a `tokio::io::duplex` pipe, or a plain `&[u8]` in tests.

use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, WirecallError};

/// Byte source with a blocking exact-read contract.
pub struct FrameReader<R> {
    inner: R,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap a byte source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read exactly `n` bytes, accumulating partial reads.
    ///
    /// Consumes bytes irreversibly; there is no pushback. Returns
    /// `ConnectionClosed` if the stream ends before `n` bytes arrive,
    /// whether 0 or `n - 1` of them were already delivered.
    pub async fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(n);
        let mut have = 0;
        while have < n {
            let read = self.inner.read(&mut buf[have..]).await?;
            if read == 0 {
                return Err(WirecallError::ConnectionClosed);
            }
            have += read;
        }
        Ok(buf.freeze())
    }

    /// Read a single byte.
    pub async fn read_u8(&mut self) -> Result<u8> {
        let mut buf = self.read_exact(1).await?;
        Ok(buf.get_u8())
    }

    /// Read a Big Endian u32.
    pub async fn read_u32(&mut self) -> Result<u32> {
        let mut buf = self.read_exact(4).await?;
        Ok(buf.get_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_read_exact_from_slice() {
        let data: &[u8] = b"hello world";
        let mut reader = FrameReader::new(data);
        assert_eq!(&reader.read_exact(5).await.unwrap()[..], b"hello");
        assert_eq!(&reader.read_exact(6).await.unwrap()[..], b" world");
    }

    #[tokio::test]
    async fn test_read_exact_accumulates_one_byte_chunks() {
        let (mut tx, rx) = tokio::io::duplex(1);
        let writer = tokio::spawn(async move {
            for b in b"payload" {
                tx.write_all(&[*b]).await.unwrap();
                tx.flush().await.unwrap();
            }
        });

        let mut reader = FrameReader::new(rx);
        let buf = reader.read_exact(7).await.unwrap();
        assert_eq!(&buf[..], b"payload");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_before_any_bytes_is_connection_closed() {
        let (tx, rx) = tokio::io::duplex(64);
        drop(tx);

        let mut reader = FrameReader::new(rx);
        assert!(matches!(
            reader.read_exact(4).await,
            Err(WirecallError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_close_after_partial_bytes_is_connection_closed() {
        let (mut tx, rx) = tokio::io::duplex(64);
        tx.write_all(b"ab").await.unwrap();
        drop(tx);

        let mut reader = FrameReader::new(rx);
        // 2 of 4 requested bytes arrived; must not return a short buffer.
        assert!(matches!(
            reader.read_exact(4).await,
            Err(WirecallError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_read_u32_big_endian() {
        let data: &[u8] = &[0x00, 0x00, 0x01, 0x02];
        let mut reader = FrameReader::new(data);
        assert_eq!(reader.read_u32().await.unwrap(), 0x0102);
    }

    #[tokio::test]
    async fn test_read_u8() {
        let data: &[u8] = &[7];
        let mut reader = FrameReader::new(data);
        assert_eq!(reader.read_u8().await.unwrap(), 7);
        assert!(matches!(
            reader.read_u8().await,
            Err(WirecallError::ConnectionClosed)
        ));
    }
}
