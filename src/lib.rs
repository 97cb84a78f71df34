pub mod shared {
    pub mod core {
        pub mod clock;
    }
    pub mod infrastructure {
        pub mod change_feed;
        pub mod rest_client;
    }
}

pub mod modules {
    pub mod habits {
        pub mod core {
            pub mod board;
            pub mod decision;
            pub mod evaluate;
            pub mod events;
            pub mod evolve;
            pub mod habit;
            pub mod intents;
            pub mod ports;
            pub mod schedule;
            pub mod slot_matching;
            pub mod state;
        }
        pub mod use_cases {
            pub mod errors;
            pub mod reconciler;
            pub mod record_outcome {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod undo_record {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod manage_habit {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod select_habit {
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod habit_history {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod list_board {
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod in_memory_store;
                pub mod intent_dispatch;
                pub mod rest_store;
            }
        }
    }
    pub mod coach {
        pub mod core {
            pub mod ports;
            pub mod reply;
            pub mod transcript;
        }
        pub mod use_cases {
            pub mod send_message {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod rest_coach;
                pub mod scripted_coach;
            }
        }
    }
    pub mod notifications {
        pub mod core {
            pub mod ports;
            pub mod subscription;
        }
        pub mod use_cases {
            pub mod toggle_push {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod in_memory_registry;
                pub mod rest_registry;
            }
        }
    }
}

pub mod shell;
