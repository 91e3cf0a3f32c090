//! 测试模式：在没有采集器的情况下生成一段振荡的历史数据。

use chrono::{DateTime, Duration, SubsecRound, Utc};
use hpmon_storage::{DeviceRecord, Metadata};
use hpmon_telemetry::value::round_to;
use hpmon_telemetry::Snapshot;
use rand::seq::SliceRandom;
use rand::Rng;

pub const TEST_DEVICE: &str = "kaisai_khc_08ry3_test";
pub const POINTS: usize = 30;
pub const SPACING_MINUTES: i64 = 10;
/// 第 25 个点与最后一个点上报的故障码
pub const TEST_FAULT: i32 = 21;

const DEFROST_EVERY: usize = 15;
const FAULT_HISTORY_INDEX: usize = 25;
/// 大多数时间处于制热
const MODES: [i32; 8] = [0, 2, 3, 3, 3, 3, 3, 3];

/// 生成以 `now` 结尾的合成设备记录
pub fn generate<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> DeviceRecord {
    let now = now.trunc_subsecs(0);
    let mut timeseries: Vec<Snapshot> = (0..POINTS).map(|i| point(now, i, rng)).collect();

    if let Some(last) = timeseries.last_mut() {
        last.current_fault = TEST_FAULT;
    }

    DeviceRecord {
        device: TEST_DEVICE.to_string(),
        data_interval_minutes: None,
        unit: None,
        metadata: Metadata {
            description: "Kaisai KHC-08RY3 Heat Pump (TEST MODE)".to_string(),
            location: "Test Environment".to_string(),
            system_status: "test_mode".to_string(),
            total_duration_minutes: ((POINTS as i64 - 1) * SPACING_MINUTES) as u64,
            ..Metadata::default()
        },
        timeseries,
    }
}

fn point<R: Rng + ?Sized>(now: DateTime<Utc>, i: usize, rng: &mut R) -> Snapshot {
    let back = (POINTS - 1 - i) as i64 * SPACING_MINUTES;
    let phase = i as f64 * 0.3;
    let wave = phase.sin();

    let freq = 43.0 + 3.0 * wave;
    let t4 = -2.0 + 1.5 * (phase * 0.5).sin();
    let tw_in = 30.0 + 2.0 * wave;
    let tw_out = tw_in + 5.0 + 0.5 * (phase * 0.7).sin();
    let current = 4.0 + 0.5 * wave;
    let voltage = 224.0 + 3.0 * (phase * 0.3).sin();
    let fault = if i == FAULT_HISTORY_INDEX { TEST_FAULT } else { 0 };

    Snapshot {
        operating_frequency_hz: int(freq),
        operating_mode: MODES.choose(rng).copied().unwrap_or(3),
        fan_speed_rpm: int(540.0 + 20.0 * wave),
        pmv_openness_p: int(90.0 + 8.0 * wave),
        water_inlet_temp_c: int(tw_in),
        water_outlet_temp_c: int(tw_out),
        t3_condenser_temp_c: int(-5.0 + 1.5 * wave),
        t4_ambient_temp_c: int(t4),
        discharge_temp_c: int(46.0 + 3.0 * wave),
        return_air_temp_c: int(-5.0 + 1.5 * wave),
        t1_total_water_outlet_c: int(tw_out - 1.0),
        t1b_water_outlet_after_heater_c: int(25.0 + wave),
        t2_refrigerant_liquid_c: int(32.0 + 2.0 * wave),
        t2b_refrigerant_gas_c: int(39.0 + 2.0 * wave),
        ta_room_temp_c: int(25.0 + 0.5 * (phase * 0.2).sin()),
        pressure1_high_kpa: int(2160.0 + 30.0 * wave),
        pressure2_low_kpa: int(2100.0 + 20.0 * wave),
        outdoor_unit_current_a: int(current),
        outdoor_unit_voltage_v: int(voltage),
        compressor_operation_time_h: int(4221.0 + i as f64 * 0.17),
        unit_capacity_kw: 8,
        current_fault: fault,
        fault_1: fault,
        unit_target_frequency_hz: int(freq + 1.0),
        dc_bus_current_a: int(current),
        dc_bus_voltage_v: int(37.0 + wave),
        tf_module_temp_c: int(19.0 + 2.0 * wave),
        water_flow_m3h: round_to(0.73 + 0.05 * wave, 2),
        hydraulic_module_ability_kw: round_to(3.95 + 0.3 * wave, 2),
        electricity_consumption_kwh: int(3449.0 + i as f64 * 0.7),
        power_output_kwh: int(15025.0 + i as f64 * 3.1),
        status_defrost: i % DEFROST_EVERY == 0,
        setting_water_temperature_t1s_zone1: 35,
        ..Snapshot::at(now - Duration::minutes(back))
    }
}

/// 整数寄存器字段只保存整数
fn int(value: f64) -> i32 {
    value.round() as i32
}
