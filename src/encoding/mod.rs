//! Calldata encoding for Safe deployments

mod calldata;
mod words;

pub use calldata::{
    data_offset, decode_create_call, decode_create_input, decode_initializer, encode_create_call,
    encode_initializer, DecodedInitializer,
};
