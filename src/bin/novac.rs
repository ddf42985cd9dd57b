use std::io;

use ingredient_nova::IngredientClassifier;
use ingredient_nova::cli::{self, NovacArgs};
use ingredient_nova::providers::onnx::OnnxNovaModel;
use ortho_config::OrthoConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = NovacArgs::load()?;
    let classifier = IngredientClassifier::<OnnxNovaModel>::load(args.engine()?)?;
    cli::run(
        &classifier,
        io::stdin().lock(),
        io::BufWriter::new(io::stdout().lock()),
        args.pretty,
    )?;
    Ok(())
}
