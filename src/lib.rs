//! Mentalist Scroll core crate.
//!
//! An endlessly scrolling list of "random" words that covertly steers the word
//! landing at the viewport center, spelling out a word chosen by the operator
//! one letter per scroll-stop (or revealing it whole after a countdown).
//! Everything except the `web` glue is target-independent and runs natively
//! under `cargo test`.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod controller;
pub mod deck;
pub mod engine;
pub mod error;
pub mod feed;
pub mod logger;
pub mod motion;
pub mod random;
pub mod session;
pub mod surface;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
mod web;

pub use catalog::WordCatalog;
pub use config::ForceConfig;
pub use controller::{Controller, Event, Outcome};
pub use engine::StopOutcome;
pub use error::{ArmError, CatalogError, ConfigError};
pub use session::{ArmCommand, SessionMode, SessionState};
pub use surface::{FixedRowSurface, RenderedItem, Surface};
pub use viewport::ItemId;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Built-in word dataset, used when the page is started without a catalog.
// Uppercase ASCII, unique, no list-boundary sentinels.
// -----------------------------------------------------------------------------

pub const SAMPLE_WORDS: &[&str] = &[
    "ABEILLE", "ARBRE", "AVION", "ANANAS", "ALBUM", "AMI", "ANCRE", "ARGENT", "AUTOMNE", "AVOCAT",
    "BALLON", "BATEAU", "BANANE", "BOUGIE", "BROSSE", "BUREAU", "BIJOU", "BALEINE",
    "CHAT", "CHIEN", "CERISE", "CITRON", "COUSSIN", "CRAYON", "CAMION", "CHATEAU", "CLOCHE",
    "DAUPHIN", "DRAGON", "DOMINO", "DIAMANT", "DRAPEAU", "DOUCHE",
    "ECHELLE", "ECLAIR", "ETOILE", "EPONGE", "ENVELOPPE", "ESCARGOT",
    "FLEUR", "FORET", "FROMAGE", "FUSEE", "FENETRE", "FOURMI",
    "GATEAU", "GIRAFE", "GUITARE", "GLACE", "GRENOUILLE", "GANT",
    "HIBOU", "HORLOGE", "HAMAC", "HARPE", "HELICE",
    "IGLOO", "ILE", "INSECTE", "IMAGE", "IVOIRE",
    "JARDIN", "JOUET", "JUPE", "JONGLEUR", "JAGUAR",
    "KAYAK", "KIWI", "KOALA", "KIMONO",
    "LAPIN", "LUNE", "LAMPE", "LIVRE", "LION", "LOUPE",
    "MAISON", "MIROIR", "MOUTON", "MONTAGNE", "MANTEAU", "MUSIQUE",
    "NUAGE", "NAVIRE", "NEIGE", "NOISETTE", "NID",
    "OISEAU", "ORANGE", "OURS", "OLIVE", "OMBRELLE",
    "PAPILLON", "POMME", "PIANO", "PLUME", "PORTE", "POISSON",
    "QUILLE", "QUAI", "QUARTZ",
    "RENARD", "ROSE", "ROBOT", "RIVIERE", "RADIO",
    "SOLEIL", "SAPIN", "SERPENT", "SAVON", "SOURIS", "SIFFLET",
    "TIGRE", "TAMBOUR", "TORTUE", "TRAIN", "TULIPE", "TOMATE",
    "UNIVERS", "USINE", "URNE",
    "VIOLON", "VOITURE", "VOLCAN", "VALISE", "VELO",
    "WAGON", "WAPITI",
    "XYLOPHONE",
    "YAOURT", "YACHT",
    "ZEBRE", "ZERO", "ZIGZAG",
];

/// Catalog built from [`SAMPLE_WORDS`] with both indices.
pub fn sample_catalog() -> WordCatalog {
    WordCatalog::indexed(SAMPLE_WORDS.iter().copied())
}
