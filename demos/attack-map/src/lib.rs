use wasm_bindgen::prelude::*;
use globe_engine::*;

mod countries;
mod feed;
use feed::SimulatedFeed;

globe_web::export_globe!(SimulatedFeed, "attack-map");
