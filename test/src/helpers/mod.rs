pub mod packet_exchange;
pub mod test_generator;

pub use memory_section::MemorySection;
pub use packet_exchange::{deliver_subscription_payload, frame_for_client, init_logging};
pub use recording_sender::RecordingSender;
pub use structure_builder::{raw_nbt, record, spread_records, structure_data_tree};
pub use test_generator::TestGenerator;
pub use test_host::{TestChunks, TestHost};
