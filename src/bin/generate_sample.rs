use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Booster eras: (category, version prefix, flights, success probability,
/// max payload in kg).
const ERAS: [(&str, &str, usize, f64, f64); 5] = [
    ("v1.0", "F9 v1.0  B000", 5, 0.0, 1_000.0),
    ("v1.1", "F9 v1.1  B10", 15, 0.1, 5_000.0),
    ("FT", "F9 FT B10", 24, 0.65, 9_600.0),
    ("B4", "F9 B4 B10", 11, 0.55, 9_600.0),
    ("B5", "F9 B5 B10", 1, 1.0, 3_700.0),
];

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

struct Launch {
    flight_number: i64,
    site: String,
    class: i64,
    payload_mass_kg: f64,
    booster_version: String,
    booster_category: String,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut launches = Vec::new();
    let mut flight_number: i64 = 1;
    for (category, version_prefix, flights, p_success, max_payload) in ERAS {
        for n in 0..flights {
            // Round to whole kilograms like the published manifest.
            let payload_mass_kg = (rng.next_f64() * max_payload).round();
            let class = i64::from(rng.next_f64() < p_success);
            launches.push(Launch {
                flight_number,
                site: rng.pick(&SITES).to_string(),
                class,
                payload_mass_kg,
                booster_version: format!("{version_prefix}{:02}", n + 1),
                booster_category: category.to_string(),
            });
            flight_number += 1;
        }
    }

    // ---- CSV ----
    let csv_path = "spacex_launch_dash.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "",
            "Flight Number",
            "Launch Site",
            "class",
            "Payload Mass (kg)",
            "Booster Version",
            "Booster Version Category",
        ])
        .expect("Failed to write CSV header");
    for (i, l) in launches.iter().enumerate() {
        writer
            .write_record([
                i.to_string(),
                l.flight_number.to_string(),
                l.site.clone(),
                l.class.to_string(),
                format!("{:.1}", l.payload_mass_kg),
                l.booster_version.clone(),
                l.booster_category.clone(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
        Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site.as_str()))),
        Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
        Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload_mass_kg))),
        Arc::new(StringArray::from_iter_values(
            launches.iter().map(|l| l.booster_version.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            launches.iter().map(|l| l.booster_category.as_str()),
        )),
    ];

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let parquet_path = "spacex_launch_dash.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} launches to {csv_path} and {parquet_path}",
        launches.len()
    );
}
