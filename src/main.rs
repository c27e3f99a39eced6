use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

mod batch;
mod codes;
mod grid;
mod request;
mod strip;
mod strip_renderer;
mod validator;

use batch::BatchOutcome;
use strip::CARDS_PER_STRIP;

const MAX_QUANTITY: u32 = 9999;

#[derive(Serialize)]
struct TicketExport<'a> {
    numbers: &'a [u8],
    code: Option<&'a str>,
}

#[derive(Serialize)]
struct StripExport<'a> {
    tickets: Vec<TicketExport<'a>>,
}

#[derive(Serialize)]
struct BatchExport<'a> {
    expiry_date: Option<String>,
    strips: Vec<StripExport<'a>>,
}

fn main() {
    let request_path = std::env::args().nth(1).unwrap_or_else(|| "strip_request.json".to_string());
    let request = request::read_strip_request(&request_path).unwrap();

    let quantity = request.quantity.clamp(1, MAX_QUANTITY) as usize;
    if quantity as u32 != request.quantity {
        eprintln!("Requested quantity {} clamped to {quantity}", request.quantity);
    }

    let mut rng = match request.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let mut batch = batch::generate_batch(quantity, &mut rng);
    if batch.outcome == BatchOutcome::BudgetExhausted {
        eprintln!(
            "Warning: only {} of {quantity} strips generated within {} attempts",
            batch.strips.len(),
            batch.attempts
        );
    }
    if batch.strips.is_empty() {
        // Never hand the caller nothing: a single fresh strip is always valid
        // on its own, it just loses the batch-uniqueness guarantee.
        batch.strips.push(strip::generate_strip(&mut rng));
    }

    for (i, s) in batch.strips.iter().enumerate() {
        let report = validator::validate_strip(s);
        if !report.ok {
            eprintln!(
                "Warning: strip {} failed validation (missing {:?}, duplicates {:?})",
                i + 1,
                report.missing,
                report.duplicates
            );
        }
    }

    let codes = match codes::generate_unique_codes(
        batch.strips.len() * CARDS_PER_STRIP,
        request.code_digits,
        &mut rng,
    ) {
        Ok(codes) => codes,
        Err(e) => {
            eprintln!("Failed to assign ticket codes: {e}");
            std::process::exit(1);
        }
    };

    let expiry = request.expiry_date.as_deref().map(request::format_expiry);

    let out_dir = std::path::Path::new(&request.output_dir);
    std::fs::create_dir_all(out_dir).unwrap();

    let export = BatchExport {
        expiry_date: expiry.clone(),
        strips: batch
            .strips
            .iter()
            .enumerate()
            .map(|(i, s)| StripExport {
                tickets: s
                    .cards
                    .iter()
                    .enumerate()
                    .map(|(j, card)| TicketExport {
                        numbers: &card.numbers,
                        code: codes.get(i * CARDS_PER_STRIP + j).map(String::as_str),
                    })
                    .collect(),
            })
            .collect(),
    };
    let json_path = out_dir.join("batch.json");
    let file = std::fs::File::create(&json_path).unwrap();
    serde_json::to_writer_pretty(file, &export).unwrap();

    for (i, s) in batch.strips.iter().enumerate() {
        let strip_codes = &codes[i * CARDS_PER_STRIP..(i + 1) * CARDS_PER_STRIP];
        let png_path = out_dir.join(format!("strip_{:04}.png", i + 1));
        if let Err(e) = strip_renderer::render_strip_to_png(
            s,
            strip_codes,
            i + 1,
            expiry.as_deref(),
            &png_path.to_string_lossy(),
        ) {
            eprintln!("Failed to render strip {}: {e}", i + 1);
        }
    }

    println!(
        "Wrote {} strips to {} ({} and one PNG per strip)",
        batch.strips.len(),
        out_dir.display(),
        json_path.display()
    );
}
