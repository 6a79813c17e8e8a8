use amedas_processor::models::{Granularity, HourlyReading, StationReadings};
use amedas_processor::processors::{Aggregator, SeriesAssembler};
use amedas_processor::readers::WideRowDecoder;
use amedas_processor::utils::coordinates::dms_to_decimal;
use amedas_processor::utils::rounding::round_half_even;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// One daily normals row per element and month, as in a real station file
fn create_daily_lines(station: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for element in ["0500", "4000", "3500"] {
        for month in 1..=12 {
            let mut line = format!("1,{},{},30,1991,2020,{}", station, element, month);
            for day in 1..=31 {
                let flag = if day > 28 && month == 2 { 0 } else { 8 };
                line.push_str(&format!(",{},{}", 100 + day + month, flag));
            }
            lines.push(line);
        }
    }
    lines
}

// Five seasons of April..October hourly readings
fn create_station_readings(station: &str) -> StationReadings {
    let mut readings = Vec::new();
    for year in 2019..=2023 {
        let mut date = NaiveDate::from_ymd_opt(year, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(year, 10, 31).unwrap();
        while date <= end {
            for hour in 1..=24 {
                let value = 18.0 + (hour as f64 * 0.37) % 9.0 + year as f64 * 0.01;
                readings.push(HourlyReading::new(date, Some(hour), value));
            }
            date = date.succ_opt().unwrap();
        }
    }

    StationReadings {
        station_id: station.to_string(),
        file_count: 35,
        readings,
    }
}

fn benchmark_wide_row_decoder(c: &mut Criterion) {
    let lines = create_daily_lines("47401");
    let decoder = WideRowDecoder::new(Granularity::Daily);

    c.bench_function("wide_row_decode_daily", |b| {
        b.iter(|| {
            let mut decoded = 0;
            for line in &lines {
                let fields: Vec<&str> = line.split(',').collect();
                if decoder.decode(&fields, "47401").is_ok() {
                    decoded += 1;
                }
            }
            black_box(decoded)
        })
    });
}

fn benchmark_series_assembler(c: &mut Criterion) {
    let decoder = WideRowDecoder::new(Granularity::Daily);
    let rows: Vec<_> = create_daily_lines("47401")
        .iter()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            decoder.decode(&fields, "47401").ok()
        })
        .collect();
    let assembler = SeriesAssembler::new();

    c.bench_function("series_assemble_daily", |b| {
        b.iter(|| black_box(assembler.assemble_daily(&rows)))
    });
}

fn benchmark_aggregator(c: &mut Criterion) {
    let station = create_station_readings("47401");
    let aggregator = Aggregator::new();

    c.bench_function("wbgt_aggregate_station", |b| {
        b.iter(|| black_box(aggregator.aggregate(&station).map(|c| c.daily.len())))
    });
}

fn benchmark_rounding(c: &mut Criterion) {
    let values: Vec<f64> = (0..1000).map(|i| i as f64 * 0.05).collect();

    c.bench_function("round_half_even", |b| {
        b.iter(|| {
            let sum: f64 = values.iter().map(|v| round_half_even(*v, 1)).sum();
            black_box(sum)
        })
    });
}

fn benchmark_coordinate_conversion(c: &mut Criterion) {
    let dms_coordinates = vec!["45:24:54", "141:40:42", "34:40:54", "135:31:06", "26:12:18"];

    c.bench_function("coordinate_conversion", |b| {
        b.iter(|| {
            let mut results = Vec::new();
            for dms in &dms_coordinates {
                if let Ok(decimal) = dms_to_decimal(dms) {
                    results.push(decimal);
                }
            }
            black_box(results.len())
        })
    });
}

fn benchmark_varying_station_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("wbgt_by_station_count");
    let aggregator = Aggregator::new();

    for &size in &[1, 5, 20] {
        group.bench_with_input(
            BenchmarkId::new("stations", size),
            &size,
            |b, &station_count| {
                let stations: Vec<StationReadings> = (0..station_count)
                    .map(|i| create_station_readings(&format!("{:05}", 47401 + i)))
                    .collect();

                b.iter(|| {
                    let aggregated = stations
                        .iter()
                        .filter_map(|s| aggregator.aggregate(s))
                        .count();
                    black_box(aggregated)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_wide_row_decoder,
    benchmark_series_assembler,
    benchmark_aggregator,
    benchmark_rounding,
    benchmark_coordinate_conversion,
    benchmark_varying_station_counts
);
criterion_main!(benches);
