use crate::error::TransportError;
use crate::transport::RegisterTransport;
use crate::types::{LinkKind, ModbusConfig, Parity};
use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio_modbus::prelude::*;
use tokio_serial::SerialStream;
use tracing::{debug, info, warn};

/// Modbus 客户端
pub struct ModbusClient {
    config: ModbusConfig,
    context: Option<client::Context>,
}

impl ModbusClient {
    /// 创建新的 Modbus 客户端
    pub fn new(config: ModbusConfig) -> Self {
        Self {
            config,
            context: None,
        }
    }

    /// 连接到控制器
    pub async fn connect(&mut self) -> Result<(), TransportError> {
        let slave = Slave(self.config.slave_id);

        let context = match self.config.link {
            LinkKind::Rtu => client::rtu::attach_slave(self.open_serial()?, slave),
            LinkKind::Tcp => client::tcp::attach_slave(self.open_tcp().await?, slave),
        };
        self.context = Some(context);

        info!(
            endpoint = %self.config.endpoint(),
            slave_id = %self.config.slave_id,
            "Connected to Modbus controller"
        );

        Ok(())
    }

    fn open_serial(&self) -> Result<SerialStream, TransportError> {
        let parity = match self.config.parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Odd => tokio_serial::Parity::Odd,
            Parity::Even => tokio_serial::Parity::Even,
        };
        let data_bits = match self.config.data_bits {
            5 => tokio_serial::DataBits::Five,
            6 => tokio_serial::DataBits::Six,
            7 => tokio_serial::DataBits::Seven,
            _ => tokio_serial::DataBits::Eight,
        };
        let stop_bits = match self.config.stop_bits {
            2 => tokio_serial::StopBits::Two,
            _ => tokio_serial::StopBits::One,
        };

        let builder = tokio_serial::new(&self.config.serial_port, self.config.baud_rate)
            .parity(parity)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .timeout(self.config.timeout());

        SerialStream::open(&builder).map_err(|e| TransportError::Connect {
            endpoint: self.config.endpoint(),
            message: e.to_string(),
        })
    }

    async fn open_tcp(&self) -> Result<TcpStream, TransportError> {
        let endpoint = self.config.endpoint();
        let connect_err = |message: String| TransportError::Connect {
            endpoint: endpoint.clone(),
            message,
        };

        tokio::time::timeout(self.config.timeout(), TcpStream::connect(&endpoint))
            .await
            .map_err(|_| connect_err("connect timed out".to_string()))?
            .map_err(|e| connect_err(e.to_string()))
    }

    /// 断开连接
    pub fn disconnect(&mut self) {
        self.context = None;
        debug!("Disconnected from Modbus controller");
    }

    /// 检查是否已连接
    pub fn is_connected(&self) -> bool {
        self.context.is_some()
    }
}

#[async_trait]
impl RegisterTransport for ModbusClient {
    async fn read_holding_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError> {
        let timeout = self.config.timeout();
        let ctx = self.context.as_mut().ok_or(TransportError::NotConnected)?;

        let response = tokio::time::timeout(timeout, ctx.read_holding_registers(address, count))
            .await
            .map_err(|_| TransportError::Timeout {
                address,
                timeout_ms: timeout.as_millis() as u64,
            })?;

        let values = match response {
            Ok(Ok(values)) => values,
            Ok(Err(code)) => {
                return Err(TransportError::Exception {
                    address,
                    code: format!("{:?}", code),
                })
            }
            Err(e) => {
                let err = TransportError::from(e);
                if err.is_link_failure() {
                    warn!(address = %address, error = %err, "Modbus link dropped");
                    self.context = None;
                }
                return Err(err);
            }
        };

        if values.len() != count as usize {
            return Err(TransportError::ShortResponse {
                address,
                expected: count,
                actual: values.len(),
            });
        }

        debug!(
            addr = %address,
            count = %count,
            "Read holding registers"
        );

        Ok(values)
    }
}
