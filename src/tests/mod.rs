mod codec_properties;
