use crate::error::{Result, TelemetryError};
use crate::schema::{Decode, FieldSpec, Snapshot, SCHEMA};
use crate::status;
use crate::value::{round_to, FieldValue};
use chrono::{DateTime, Utc};
use hpmon_modbus::{RegisterDecoder, RegisterTransport, TransportError};
use tracing::{debug, warn};

/// 单个字段的解码失败
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    pub field: &'static str,
    pub address: u16,
    pub error: TransportError,
}

/// 一次组装的结果
#[derive(Debug, Clone)]
pub struct Assembly {
    pub snapshot: Snapshot,
    /// 被置为默认值的字段
    pub failures: Vec<FieldFailure>,
}

impl Assembly {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 快照组装器
///
/// 按字段表顺序逐项解码。单字段失败只记录并保留默认值；
/// 链路失效或所有字段都失败时整个周期作废。
#[derive(Debug, Clone, Copy)]
pub struct SnapshotAssembler {
    schema: &'static [FieldSpec],
}

impl Default for SnapshotAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotAssembler {
    pub fn new() -> Self {
        Self { schema: SCHEMA }
    }

    /// 组装一个快照
    pub async fn assemble<T: RegisterTransport>(
        &self,
        decoder: &mut RegisterDecoder<T>,
        timestamp: DateTime<Utc>,
    ) -> Result<Assembly> {
        let mut snapshot = Snapshot {
            timestamp,
            ..Snapshot::default()
        };
        let mut failures = Vec::new();

        for spec in self.schema {
            match resolve(decoder, &spec.decode).await {
                Ok(value) => snapshot.assign(spec.name, value)?,
                Err(err) if err.is_link_failure() => {
                    return Err(TelemetryError::LinkLost {
                        field: spec.name,
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(
                        field = spec.name,
                        address = spec.decode.address(),
                        error = %err,
                        "Field decode failed, using default"
                    );
                    failures.push(FieldFailure {
                        field: spec.name,
                        address: spec.decode.address(),
                        error: err,
                    });
                }
            }
        }

        if failures.len() == self.schema.len() {
            if let Some(last) = failures.pop() {
                return Err(TelemetryError::NoResponse {
                    fields: self.schema.len(),
                    source: last.error,
                });
            }
        }

        debug!(
            fields = self.schema.len(),
            failed = failures.len(),
            "Snapshot assembled"
        );

        Ok(Assembly { snapshot, failures })
    }
}

async fn resolve<T: RegisterTransport>(
    decoder: &mut RegisterDecoder<T>,
    decode: &Decode,
) -> std::result::Result<FieldValue, TransportError> {
    let value = match *decode {
        Decode::Signed(address) => FieldValue::Int(decoder.read_signed16(address).await?.into()),
        Decode::Unsigned(address) => FieldValue::Int(decoder.read_unsigned16(address).await?.into()),
        Decode::Scaled {
            address,
            divisor,
            decimals,
        } => {
            let scaled = f64::from(decoder.read_signed16(address).await?) / divisor;
            FieldValue::Float(decimals.map_or(scaled, |d| round_to(scaled, d)))
        }
        Decode::Rounded { address, divisor } => {
            let scaled = f64::from(decoder.read_signed16(address).await?) / divisor;
            FieldValue::Int(scaled.round_ties_even() as i64)
        }
        Decode::LowByte(address) => {
            FieldValue::Int(status::low_byte(decoder.read_unsigned16(address).await?).into())
        }
        Decode::HighByte(address) => {
            FieldValue::Int(status::high_byte(decoder.read_unsigned16(address).await?).into())
        }
        Decode::Wide(address) => FieldValue::Int(decoder.read_wide32(address).await?.into()),
        Decode::Flag(word, mask) => {
            FieldValue::Bool(status::is_set(decoder.read_unsigned16(word.address()).await?, mask))
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpmon_modbus::RegisterBank;

    fn controller_bank() -> RegisterBank {
        let mut bank = RegisterBank::new();
        bank.set(2, 0x2D23); // zone1 35, zone2 45
        bank.set(100, 43);
        bank.set(101, 3);
        bank.set(102, 540);
        bank.set(103, 432); // 90 after ÷4.8
        bank.set(104, 30);
        bank.set(105, 35);
        bank.set(107, (-2i16) as u16);
        bank.set(116, 2160);
        bank.set(124, 21);
        bank.set(128, 0x03);
        bank.set(129, 0x14);
        bank.set(138, 73);
        bank.set(140, 395);
        bank.set_range(143, &[0x0000, 3449]);
        bank.set_range(145, &[0x0001, 0x0002]);
        bank
    }

    #[tokio::test]
    async fn test_assemble_full_snapshot() {
        let mut decoder = RegisterDecoder::new(controller_bank());
        let now = Utc::now();

        let assembly = SnapshotAssembler::new().assemble(&mut decoder, now).await.unwrap();
        assert!(assembly.is_complete());

        let s = assembly.snapshot;
        assert_eq!(s.timestamp, now);
        assert_eq!(s.setting_water_temperature_t1s_zone1, 35);
        assert_eq!(s.setting_water_temperature_t1s_zone2, 45);
        assert_eq!(s.operating_frequency_hz, 43);
        assert_eq!(s.pmv_openness_p, 90);
        assert_eq!(s.t4_ambient_temp_c, -2);
        assert_eq!(s.pressure1_high_kpa, 2160);
        assert_eq!(s.current_fault, 21);
        assert_eq!(s.water_flow_m3h, 0.73);
        assert_eq!(s.hydraulic_module_ability_kw, 3.95);
        assert_eq!(s.electricity_consumption_kwh, 3449);
        assert_eq!(s.power_output_kwh, 65538);
    }

    #[tokio::test]
    async fn test_status_flags_use_exact_mask_match() {
        let mut decoder = RegisterDecoder::new(controller_bank());
        let s = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap()
            .snapshot;

        // 0x03
        assert!(s.status_reserved_1);
        assert!(s.status_defrost);
        assert!(s.status_anti_freeze);
        assert!(!s.status_oil_return);
        assert!(!s.status_remote_on_off);

        // 0x14
        assert!(s.load_output_run);
        assert!(s.load_output_water_pump_pump_i);
        assert!(s.load_output_sv3);
        assert!(!s.load_output_alarm);
        assert!(!s.load_output_electric_heater_ibh1);
    }

    #[tokio::test]
    async fn test_each_register_range_read_once() {
        let mut decoder = RegisterDecoder::new(controller_bank());
        SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap();

        // 地址 2、100..=127、128、129、132..=140、143(2)、145(2)
        let expected = 1 + 28 + 2 + 9 + 2;
        assert_eq!(decoder.transport().read_count(), expected);
    }

    #[tokio::test]
    async fn test_field_failure_defaults_value() {
        let mut bank = controller_bank();
        bank.fail_at(104);
        bank.fail_at(146);
        let mut decoder = RegisterDecoder::new(bank);

        let assembly = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap();

        let failed: Vec<&str> = assembly.failures.iter().map(|f| f.field).collect();
        assert_eq!(failed, vec!["water_inlet_temp_c", "power_output_kwh"]);
        assert_eq!(assembly.snapshot.water_inlet_temp_c, 0);
        assert_eq!(assembly.snapshot.power_output_kwh, 0);
        assert_eq!(assembly.snapshot.water_outlet_temp_c, 35);
    }

    #[tokio::test]
    async fn test_failed_status_word_defaults_all_its_flags() {
        let mut bank = controller_bank();
        bank.fail_at(128);
        let mut decoder = RegisterDecoder::new(bank);

        let assembly = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap();

        assert_eq!(assembly.failures.len(), 16);
        assert!(!assembly.snapshot.status_defrost);
        assert!(assembly.snapshot.load_output_run);
    }

    #[tokio::test]
    async fn test_link_loss_aborts_cycle() {
        let mut bank = controller_bank();
        bank.set_link_down(true);
        let mut decoder = RegisterDecoder::new(bank);

        let err = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TelemetryError::LinkLost {
                field: "setting_water_temperature_t1s_zone1",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_silent_controller_yields_no_snapshot() {
        let mut bank = RegisterBank::new();
        for address in 0..200 {
            bank.fail_at(address);
        }
        let mut decoder = RegisterDecoder::new(bank);

        let err = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TelemetryError::NoResponse { fields, .. } if fields == SCHEMA.len()
        ));
    }

    #[tokio::test]
    async fn test_single_answering_register_keeps_snapshot() {
        let mut bank = RegisterBank::new().with_register(100, 44);
        for address in (0..200).filter(|a| *a != 100) {
            bank.fail_at(address);
        }
        let mut decoder = RegisterDecoder::new(bank);

        let assembly = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap();

        assert_eq!(assembly.failures.len(), SCHEMA.len() - 1);
        assert_eq!(assembly.snapshot.operating_frequency_hz, 44);
    }

    #[tokio::test]
    async fn test_pmv_rounds_half_to_even() {
        // 12 / 4.8 = 2.5 -> 2
        let bank = RegisterBank::new().with_register(103, 12);
        let mut decoder = RegisterDecoder::new(bank);
        let s = SnapshotAssembler::new()
            .assemble(&mut decoder, Utc::now())
            .await
            .unwrap()
            .snapshot;
        assert_eq!(s.pmv_openness_p, 2);
    }
}
