use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// 保持寄存器读取接口
///
/// 采集核心只依赖这一个原语，串口/TCP 会话由实现方负责。
#[async_trait]
pub trait RegisterTransport: Send {
    /// 读取 `count` 个连续的保持寄存器
    async fn read_holding_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError>;
}

#[async_trait]
impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    async fn read_holding_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError> {
        (**self).read_holding_registers(address, count).await
    }
}

/// 内存寄存器表
///
/// 用于测试与模拟：未写入的地址读出 0，可注入单地址故障或整条链路断开。
#[derive(Debug, Clone, Default)]
pub struct RegisterBank {
    registers: HashMap<u16, u16>,
    faulty: HashSet<u16>,
    link_down: bool,
    reads: usize,
}

impl RegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_register(mut self, address: u16, value: u16) -> Self {
        self.set(address, value);
        self
    }

    pub fn set(&mut self, address: u16, value: u16) {
        self.registers.insert(address, value);
    }

    /// 从 `start` 开始连续写入
    pub fn set_range(&mut self, start: u16, values: &[u16]) {
        for (offset, value) in values.iter().enumerate() {
            self.set(start + offset as u16, *value);
        }
    }

    /// 让该地址的读取返回从站异常
    pub fn fail_at(&mut self, address: u16) {
        self.faulty.insert(address);
    }

    pub fn set_link_down(&mut self, down: bool) {
        self.link_down = down;
    }

    /// 已执行的读请求数
    pub fn read_count(&self) -> usize {
        self.reads
    }
}

#[async_trait]
impl RegisterTransport for RegisterBank {
    async fn read_holding_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError> {
        self.reads += 1;

        if self.link_down {
            return Err(TransportError::Link("register bank link is down".to_string()));
        }

        (address..address.saturating_add(count))
            .map(|addr| {
                if self.faulty.contains(&addr) {
                    Err(TransportError::Exception {
                        address: addr,
                        code: "IllegalDataAddress".to_string(),
                    })
                } else {
                    Ok(self.registers.get(&addr).copied().unwrap_or(0))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_bank_reads() {
        let mut bank = RegisterBank::new().with_register(100, 42);
        bank.set_range(143, &[0x0001, 0x0002]);

        assert_eq!(bank.read_holding_registers(100, 1).await.unwrap(), vec![42]);
        assert_eq!(
            bank.read_holding_registers(143, 2).await.unwrap(),
            vec![0x0001, 0x0002]
        );
        assert_eq!(bank.read_holding_registers(7, 1).await.unwrap(), vec![0]);
        assert_eq!(bank.read_count(), 3);
    }

    #[tokio::test]
    async fn test_register_bank_faults() {
        let mut bank = RegisterBank::new();
        bank.fail_at(144);

        let err = bank.read_holding_registers(143, 2).await.unwrap_err();
        assert!(matches!(err, TransportError::Exception { address: 144, .. }));

        bank.set_link_down(true);
        let err = bank.read_holding_registers(100, 1).await.unwrap_err();
        assert!(err.is_link_failure());
    }
}
