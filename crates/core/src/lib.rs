pub mod audio {
    pub mod domain {
        pub mod audio_reader;
        pub mod audio_segment;
        pub mod speech_recognizer;
        pub mod speech_synthesizer;
    }
    pub mod infrastructure;
}

pub mod captions {
    pub mod domain {
        pub mod caption_segmenter;
        pub mod interval_builder;
        pub mod text_layout;
        pub mod timestamp_mapper;
        pub mod transcript;
    }
}

pub mod footage {
    pub mod domain {
        pub mod footage;
        pub mod footage_matcher;
        pub mod footage_provider;
        pub mod interval_merger;
        pub mod retry;
        pub mod used_footage;
    }
    pub mod infrastructure;
}

pub mod planning {
    pub mod domain {
        pub mod query_planner;
        pub mod term_extractor;
    }
    pub mod infrastructure;
}

pub mod render {
    pub mod domain {
        pub mod clip_fetcher;
        pub mod renderer;
        pub mod subtitles;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod generate_video_use_case;
    pub mod match_executor;
    pub mod pipeline_error;
    pub mod pipeline_logger;
    pub mod script_source;
    pub mod infrastructure;
}

pub mod shared {
    pub mod constants;
    pub mod model_resolver;
    pub mod settings;
    pub mod timeline;
}
