pub mod demux;
pub mod frame_decoder;
pub mod wav_format;
