use crate::error::TransportError;
use crate::transport::RegisterTransport;
use std::collections::HashMap;
use tracing::trace;

/// 将原始 16 位寄存器值按补码解释为有符号数
pub const fn to_int16(raw: u16) -> i16 {
    raw as i16
}

/// 两个寄存器按大端字序（高位字在前）组合为 32 位有符号数
pub const fn compose_wide32(high: u16, low: u16) -> i32 {
    (((high as u32) << 16) | low as u32) as i32
}

/// 寄存器解码器
///
/// 持有传输句柄。同一个解码器内对相同 `(address, count)` 的读取只访问一次总线，
/// 失败结果同样被缓存，因此每个采集周期应创建新的解码器。
pub struct RegisterDecoder<T> {
    transport: T,
    cache: HashMap<(u16, u16), Result<Vec<u16>, TransportError>>,
}

impl<T: RegisterTransport> RegisterDecoder<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: HashMap::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 读取连续寄存器，不做任何转换
    pub async fn read_raw(&mut self, address: u16, count: u16) -> Result<Vec<u16>, TransportError> {
        if let Some(cached) = self.cache.get(&(address, count)) {
            return cached.clone();
        }

        let result = self.transport.read_holding_registers(address, count).await;
        trace!(address = %address, count = %count, ok = result.is_ok(), "Register read");

        self.cache.insert((address, count), result.clone());
        result
    }

    pub async fn read_unsigned16(&mut self, address: u16) -> Result<u16, TransportError> {
        let words = self.read_raw(address, 1).await?;
        words.first().copied().ok_or(TransportError::ShortResponse {
            address,
            expected: 1,
            actual: 0,
        })
    }

    pub async fn read_signed16(&mut self, address: u16) -> Result<i16, TransportError> {
        self.read_unsigned16(address).await.map(to_int16)
    }

    /// 读取 `address` 与 `address + 1`，高位字在前
    pub async fn read_wide32(&mut self, address: u16) -> Result<i32, TransportError> {
        match self.read_raw(address, 2).await?.as_slice() {
            [high, low] => Ok(compose_wide32(*high, *low)),
            other => Err(TransportError::ShortResponse {
                address,
                expected: 2,
                actual: other.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RegisterBank;

    #[test]
    fn test_to_int16() {
        assert_eq!(to_int16(0x0000), 0);
        assert_eq!(to_int16(0x7FFF), 32767);
        assert_eq!(to_int16(0x8000), -32768);
        assert_eq!(to_int16(0xFFFF), -1);
        assert_eq!(to_int16(0xFFF6), -10);
    }

    #[test]
    fn test_compose_wide32() {
        assert_eq!(compose_wide32(0x0001, 0x0002), 65538);
        assert_eq!(compose_wide32(0xFFFF, 0xFFFF), -1);
        assert_eq!(compose_wide32(0x0000, 0xFFFF), 65535);
        assert_eq!(compose_wide32(0x8000, 0x0000), i32::MIN);
    }

    #[tokio::test]
    async fn test_decoder_reads() {
        let mut bank = RegisterBank::new().with_register(107, 0xFFFE);
        bank.set_range(145, &[0x0001, 0x0002]);
        let mut decoder = RegisterDecoder::new(bank);

        assert_eq!(decoder.read_signed16(107).await.unwrap(), -2);
        assert_eq!(decoder.read_unsigned16(107).await.unwrap(), 0xFFFE);
        assert_eq!(decoder.read_wide32(145).await.unwrap(), 65538);
        assert_eq!(decoder.read_raw(145, 2).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_decoder_caches_reads_per_range() {
        let bank = RegisterBank::new().with_register(128, 0x03);
        let mut decoder = RegisterDecoder::new(bank);

        for _ in 0..16 {
            decoder.read_unsigned16(128).await.unwrap();
        }
        decoder.read_wide32(128).await.unwrap();

        assert_eq!(decoder.transport().read_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_address() {
        let mut bank = RegisterBank::new().with_register(101, 3);
        bank.fail_at(100);
        let mut decoder = RegisterDecoder::new(bank);

        assert!(decoder.read_signed16(100).await.is_err());
        assert_eq!(decoder.read_signed16(101).await.unwrap(), 3);
    }
}
