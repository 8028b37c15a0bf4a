mod test_utils;
mod decoder_tests;
