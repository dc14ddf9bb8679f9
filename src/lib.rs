pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod logging {
            pub mod console_sink;
            pub mod line_formatter;
            pub mod response_stream_sink;
            pub mod settings;
            pub mod sinks;
            pub mod subscriber;
        }
    }
}

pub mod modules {
    pub mod archiving {
        pub mod core {
            pub mod archive_request;
            pub mod deprecation;
            pub mod execution_context;
            pub mod invocation_plan;
            pub mod job;
            pub mod ports;
        }
        pub mod use_cases {
            pub mod route_invocation {
                pub mod router;
            }
            pub mod authenticate {
                pub mod gate;
            }
            pub mod select_log_sink {
                pub mod selector;
            }
            pub mod run_archive {
                pub mod handler;
                pub mod inbound {
                    pub mod console;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod cron_archiver;
                pub mod in_memory_site_archiver;
            }
        }
    }
}

pub mod shell;
